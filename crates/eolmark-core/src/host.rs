//! Host editor capabilities.
//!
//! The engine never owns editors. It reaches the host through these traits; a host wires its
//! own editor model to them. [`Workspace`](crate::Workspace) is an in-memory implementation.

use crate::decorations::{DecorationStyle, StyleHandle};
use crate::document::TextDocument;
use crate::position::{Selection, TextRange};
use crate::theme::ThemeProvider;
use eolmark_config::ConfigSource;

/// Opaque identifier for an editor (a view onto a document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(pub u64);

impl EditorId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An editor surface that can show decorations.
pub trait EditorView {
    /// The document type shown by this editor.
    type Document: TextDocument;

    /// The error type returned by host calls. Failures are propagated, never retried.
    type Error;

    /// The editor's identifier.
    fn id(&self) -> EditorId;

    /// The document shown in this editor.
    fn document(&self) -> &Self::Document;

    /// Current selections (possibly empty carets).
    fn selections(&self) -> &[Selection];

    /// Currently visible ranges, in document order.
    fn visible_ranges(&self) -> &[TextRange];

    /// Create a style handle owned by this editor.
    fn create_style(&mut self, style: DecorationStyle) -> Result<StyleHandle, Self::Error>;

    /// Dispose a style handle previously created by this editor.
    fn dispose_style(&mut self, handle: StyleHandle) -> Result<(), Self::Error>;

    /// Replace every decoration shown with `handle` by `ranges`.
    fn set_decorations(
        &mut self,
        handle: StyleHandle,
        ranges: &[TextRange],
    ) -> Result<(), Self::Error>;
}

/// The host window: editor lookup plus the configuration and theme capabilities.
pub trait Workbench {
    /// The host's editor type.
    type Editor: EditorView;

    /// The focused editor, if any.
    fn active_editor(&self) -> Option<EditorId>;

    /// Every editor currently shown.
    fn visible_editors(&self) -> Vec<EditorId>;

    /// Look up an editor.
    fn editor(&self, id: EditorId) -> Option<&Self::Editor>;

    /// Look up an editor mutably.
    fn editor_mut(&mut self, id: EditorId) -> Option<&mut Self::Editor>;

    /// The configuration store.
    fn config(&self) -> &dyn ConfigSource;

    /// The active theme.
    fn theme(&self) -> &dyn ThemeProvider;
}

/// The error type of a workbench's editors.
pub type HostError<W> = <<W as Workbench>::Editor as EditorView>::Error;
