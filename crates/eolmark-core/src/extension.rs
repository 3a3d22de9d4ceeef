//! Event wiring: the extension object a host activates.
//!
//! [`EolExtension`] owns the settings resolver and the refresh engine. Each [`EditorEvent`] is
//! handled synchronously and ends in zero or more refreshes; later refreshes simply replace
//! what earlier ones submitted.

use crate::document::TextDocument;
use crate::engine::DecorationEngine;
use crate::events::{EditorEvent, EventKind, EventSource, Subscriptions};
use crate::host::{EditorId, EditorView, HostError, Workbench};
use crate::position::TextRange;
use crate::theme::ThemeColors;
use eolmark_config::SettingsResolver;
use tracing::{debug, trace};

/// The end-of-line decorator, bound to one host.
///
/// ```rust
/// use eolmark_core::{
///     EolExtension, JsonSettings, MarkerCategory, RopeDocument, Workbench, Workspace,
/// };
///
/// let mut settings = JsonSettings::new();
/// settings.set("editor.renderWhitespace", "all");
///
/// let mut workspace = Workspace::with_settings(settings);
/// let id = workspace.open_editor(RopeDocument::from_text("one\ntwo\nthree\n"));
///
/// let mut extension = EolExtension::activate(&mut workspace).unwrap();
/// let handle = extension.engine().style_handle(id, MarkerCategory::EndOfLine).unwrap();
/// assert_eq!(workspace.editor(id).unwrap().decorations(handle).len(), 3);
///
/// extension.deactivate(&mut workspace).unwrap();
/// ```
pub struct EolExtension {
    resolver: SettingsResolver,
    engine: DecorationEngine,
    subscriptions: Subscriptions,
}

impl EolExtension {
    /// Activate against `host`: read configuration, subscribe to events, decorate the active
    /// editor.
    pub fn activate<W>(host: &mut W) -> Result<Self, HostError<W>>
    where
        W: Workbench + EventSource,
    {
        Self::activate_with(host, SettingsResolver::new())
    }

    /// Like [`EolExtension::activate`], with an explicit resolver (e.g. one with a fixed native
    /// line ending).
    pub fn activate_with<W>(host: &mut W, mut resolver: SettingsResolver) -> Result<Self, HostError<W>>
    where
        W: Workbench + EventSource,
    {
        resolver.update_configuration(host.config());
        let subscriptions = Subscriptions::subscribe_all(host, &EventKind::ALL);
        debug!(kinds = ?EventKind::ALL, "eolmark activated");

        let mut extension = Self {
            resolver,
            engine: DecorationEngine::new(),
            subscriptions,
        };
        let active = host.active_editor();
        extension.refresh(host, active, None)?;
        Ok(extension)
    }

    /// The settings resolver.
    pub fn resolver(&self) -> &SettingsResolver {
        &self.resolver
    }

    /// The refresh engine.
    pub fn engine(&self) -> &DecorationEngine {
        &self.engine
    }

    /// Whether the extension still holds event subscriptions.
    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Handle one host event.
    pub fn handle_event<W: Workbench>(
        &mut self,
        host: &mut W,
        event: EditorEvent,
    ) -> Result<(), HostError<W>> {
        trace!(kind = ?event.kind(), "handling event");
        match event {
            EditorEvent::ActiveEditorChanged(editor) => self.refresh(host, editor, None),
            EditorEvent::SelectionChanged { editor, selections } => {
                if selections.is_empty() {
                    return Ok(());
                }
                self.refresh(host, Some(editor), None)
            }
            EditorEvent::VisibleRangesChanged {
                editor,
                visible_ranges,
            } => {
                if visible_ranges.is_empty() {
                    return Ok(());
                }
                self.refresh(host, Some(editor), Some(&visible_ranges))
            }
            EditorEvent::VisibleEditorsChanged(editors) => {
                for editor in editors {
                    self.refresh(host, Some(editor), None)?;
                }
                Ok(())
            }
            EditorEvent::DocumentChanged { editor } => self.refresh(host, Some(editor), None),
            EditorEvent::ConfigurationChanged => {
                let changed = self.resolver.update_configuration(host.config());
                let active = host.active_editor();
                self.refresh(host, active, None)?;
                if changed {
                    for editor in host.visible_editors() {
                        if Some(editor) != active {
                            self.refresh(host, Some(editor), None)?;
                        }
                    }
                }
                Ok(())
            }
            EditorEvent::EditorClosed(editor) => {
                self.engine.forget_editor(editor);
                Ok(())
            }
        }
    }

    /// Resolve settings for `editor`'s document, snapshot the theme and refresh.
    pub fn refresh<W: Workbench>(
        &mut self,
        host: &mut W,
        editor: Option<EditorId>,
        changed_ranges: Option<&[TextRange]>,
    ) -> Result<(), HostError<W>> {
        let Some(id) = editor else {
            return Ok(());
        };
        let Some(view) = host.editor(id) else {
            trace!(editor = ?id, "refresh for unknown editor ignored");
            return Ok(());
        };

        let language_id = view.document().language_id().map(str::to_owned);
        let settings = self.resolver.resolve(host.config(), language_id.as_deref());
        let theme = ThemeColors::resolve(host.theme());
        self.engine
            .refresh(host.editor_mut(id), changed_ranges, &settings, &theme)
    }

    /// Release subscriptions and dispose every style handle of editors that still exist.
    pub fn deactivate<W>(mut self, host: &mut W) -> Result<(), HostError<W>>
    where
        W: Workbench + EventSource,
    {
        self.subscriptions.release(host);
        for id in self.engine.tracked_editors() {
            match host.editor_mut(id) {
                Some(editor) => self.engine.release(editor)?,
                None => {
                    self.engine.forget_editor(id);
                }
            }
        }
        debug!("eolmark deactivated");
        Ok(())
    }
}
