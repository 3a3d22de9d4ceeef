//! In-memory host.
//!
//! [`Workspace`] implements every host capability ([`Workbench`], [`EventSource`],
//! [`EditorView`] via [`MemoryEditor`]) without any UI. It is used by tests and by the terminal
//! viewer, and doubles as a reference for wiring the engine into a real editor.
//!
//! Mutating calls (opening editors, moving selections, scrolling, editing, changing settings)
//! queue the matching [`EditorEvent`]s, but only for kinds that have a subscriber. The host
//! loop drains them with [`Workspace::take_events`] and hands each one to the extension.

use crate::decorations::{DecorationStyle, StyleHandle};
use crate::document::{RopeDocument, TextDocument};
use crate::events::{EditorEvent, EventKind, EventSource, SubscriptionId};
use crate::host::{EditorId, EditorView, Workbench};
use crate::position::{Position, Selection, TextRange};
use crate::theme::{StaticTheme, ThemeProvider};
use eolmark_config::{ConfigSource, JsonSettings, LineEnding};
use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use tracing::trace;

/// The range covering `height` lines starting at `top_line`, clamped to the document.
pub fn viewport_range<D: TextDocument + ?Sized>(
    document: &D,
    top_line: usize,
    height: usize,
) -> TextRange {
    let last = top_line.saturating_add(height.max(1) - 1);
    let start = document.validate_position(Position::new(top_line, 0));
    let end = document.validate_position(Position::new(last, usize::MAX));
    TextRange::new(start, end)
}

/// An editor held by a [`Workspace`].
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    id: EditorId,
    document: RopeDocument,
    selections: Vec<Selection>,
    visible_ranges: Vec<TextRange>,
    styles: BTreeMap<StyleHandle, DecorationStyle>,
    decorations: BTreeMap<StyleHandle, Vec<TextRange>>,
    next_style: u64,
    created_styles: usize,
    disposed_styles: usize,
}

impl MemoryEditor {
    /// Create an editor showing the whole of `document`, with a caret at the start.
    pub fn new(id: EditorId, document: RopeDocument) -> Self {
        let visible = viewport_range(&document, 0, document.line_count());
        Self {
            id,
            document,
            selections: vec![Selection::caret(Position::default())],
            visible_ranges: vec![visible],
            styles: BTreeMap::new(),
            decorations: BTreeMap::new(),
            next_style: 1,
            created_styles: 0,
            disposed_styles: 0,
        }
    }

    /// The style a live handle was created with.
    pub fn style(&self, handle: StyleHandle) -> Option<&DecorationStyle> {
        self.styles.get(&handle)
    }

    /// Decorations currently shown for `handle` (empty for unknown handles).
    pub fn decorations(&self, handle: StyleHandle) -> &[TextRange] {
        self.decorations.get(&handle).map_or(&[], Vec::as_slice)
    }

    /// Every live style with its decorations.
    pub fn rendered(&self) -> impl Iterator<Item = (&DecorationStyle, &[TextRange])> + '_ {
        self.styles
            .iter()
            .map(|(handle, style)| (style, self.decorations(*handle)))
    }

    /// Number of styles created over the editor's lifetime.
    pub fn created_style_count(&self) -> usize {
        self.created_styles
    }

    /// Number of styles disposed over the editor's lifetime.
    pub fn disposed_style_count(&self) -> usize {
        self.disposed_styles
    }

    /// Number of styles currently alive.
    pub fn live_style_count(&self) -> usize {
        self.styles.len()
    }
}

impl EditorView for MemoryEditor {
    type Document = RopeDocument;
    type Error = Infallible;

    fn id(&self) -> EditorId {
        self.id
    }

    fn document(&self) -> &RopeDocument {
        &self.document
    }

    fn selections(&self) -> &[Selection] {
        &self.selections
    }

    fn visible_ranges(&self) -> &[TextRange] {
        &self.visible_ranges
    }

    fn create_style(&mut self, style: DecorationStyle) -> Result<StyleHandle, Infallible> {
        let handle = StyleHandle(self.next_style);
        self.next_style += 1;
        self.created_styles += 1;
        self.styles.insert(handle, style);
        Ok(handle)
    }

    fn dispose_style(&mut self, handle: StyleHandle) -> Result<(), Infallible> {
        if self.styles.remove(&handle).is_some() {
            self.decorations.remove(&handle);
            self.disposed_styles += 1;
        }
        Ok(())
    }

    fn set_decorations(
        &mut self,
        handle: StyleHandle,
        ranges: &[TextRange],
    ) -> Result<(), Infallible> {
        if !self.styles.contains_key(&handle) {
            trace!(editor = ?self.id, ?handle, "decorations for disposed style ignored");
            return Ok(());
        }
        self.decorations.insert(handle, ranges.to_vec());
        Ok(())
    }
}

/// An in-memory window with editors, settings and a theme.
///
/// Editors are reached through [`Workbench`]; changes made through
/// [`Workbench::editor_mut`] do not queue events.
#[derive(Debug, Default)]
pub struct Workspace {
    editors: BTreeMap<EditorId, MemoryEditor>,
    visible: Vec<EditorId>,
    active: Option<EditorId>,
    settings: JsonSettings,
    theme: StaticTheme,
    subscriptions: BTreeMap<SubscriptionId, EventKind>,
    pending: VecDeque<EditorEvent>,
    next_editor_id: u64,
    next_subscription_id: u64,
}

impl Workspace {
    /// An empty workspace with default settings and theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty workspace with the given settings.
    pub fn with_settings(settings: JsonSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Builder-style theme setter.
    pub fn with_theme(mut self, theme: StaticTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Open `document` in a new editor, show it and focus it.
    pub fn open_editor(&mut self, document: RopeDocument) -> EditorId {
        self.next_editor_id += 1;
        let id = EditorId(self.next_editor_id);
        self.editors.insert(id, MemoryEditor::new(id, document));
        self.visible.push(id);
        self.active = Some(id);

        self.emit(EditorEvent::VisibleEditorsChanged(self.visible.clone()));
        self.emit(EditorEvent::ActiveEditorChanged(Some(id)));
        id
    }

    /// Close an editor. Returns `false` if it does not exist.
    pub fn close_editor(&mut self, id: EditorId) -> bool {
        if self.editors.remove(&id).is_none() {
            return false;
        }
        self.visible.retain(|v| *v != id);
        self.emit(EditorEvent::EditorClosed(id));
        self.emit(EditorEvent::VisibleEditorsChanged(self.visible.clone()));

        if self.active == Some(id) {
            self.active = self.visible.last().copied();
            self.emit(EditorEvent::ActiveEditorChanged(self.active));
        }
        true
    }

    /// Focus an editor. Returns `false` if it does not exist.
    pub fn focus(&mut self, id: EditorId) -> bool {
        if !self.editors.contains_key(&id) {
            return false;
        }
        if self.active != Some(id) {
            self.active = Some(id);
            self.emit(EditorEvent::ActiveEditorChanged(Some(id)));
        }
        true
    }

    /// Replace an editor's selections.
    pub fn set_selections(&mut self, id: EditorId, selections: Vec<Selection>) -> bool {
        let Some(editor) = self.editors.get_mut(&id) else {
            return false;
        };
        editor.selections = selections.clone();
        self.emit(EditorEvent::SelectionChanged {
            editor: id,
            selections,
        });
        true
    }

    /// Replace an editor's visible ranges.
    pub fn set_visible_ranges(&mut self, id: EditorId, visible_ranges: Vec<TextRange>) -> bool {
        let Some(editor) = self.editors.get_mut(&id) else {
            return false;
        };
        editor.visible_ranges = visible_ranges.clone();
        self.emit(EditorEvent::VisibleRangesChanged {
            editor: id,
            visible_ranges,
        });
        true
    }

    /// Show `height` lines starting at `top_line`.
    pub fn scroll_to(&mut self, id: EditorId, top_line: usize, height: usize) -> bool {
        let Some(editor) = self.editors.get(&id) else {
            return false;
        };
        let range = viewport_range(&editor.document, top_line, height);
        self.set_visible_ranges(id, vec![range])
    }

    /// Replace the text in `range`.
    pub fn edit(&mut self, id: EditorId, range: TextRange, text: &str) -> bool {
        let Some(editor) = self.editors.get_mut(&id) else {
            return false;
        };
        editor.document.replace(range, text);
        self.emit(EditorEvent::DocumentChanged { editor: id });
        true
    }

    /// Switch a document's line-ending kind.
    pub fn set_line_ending(&mut self, id: EditorId, line_ending: LineEnding) -> bool {
        let Some(editor) = self.editors.get_mut(&id) else {
            return false;
        };
        editor.document.set_line_ending(line_ending);
        self.emit(EditorEvent::DocumentChanged { editor: id });
        true
    }

    /// The settings store.
    pub fn settings(&self) -> &JsonSettings {
        &self.settings
    }

    /// Modify settings in place and announce a configuration change.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut JsonSettings)) {
        f(&mut self.settings);
        self.emit(EditorEvent::ConfigurationChanged);
    }

    /// Replace the settings and announce a configuration change.
    pub fn set_settings(&mut self, settings: JsonSettings) {
        self.update_settings(|current| *current = settings);
    }

    /// The theme.
    pub fn static_theme(&self) -> &StaticTheme {
        &self.theme
    }

    /// Replace the theme. Hosts have no theme-change event; the next refresh picks it up.
    pub fn set_theme(&mut self, theme: StaticTheme) {
        self.theme = theme;
    }

    /// Whether any subscriber listens to `kind`.
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.subscriptions.values().any(|k| *k == kind)
    }

    /// Drain the queued events.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.pending.drain(..).collect()
    }

    fn emit(&mut self, event: EditorEvent) {
        if self.is_subscribed(event.kind()) {
            self.pending.push_back(event);
        }
    }
}

impl Workbench for Workspace {
    type Editor = MemoryEditor;

    fn active_editor(&self) -> Option<EditorId> {
        self.active
    }

    fn visible_editors(&self) -> Vec<EditorId> {
        self.visible.clone()
    }

    fn editor(&self, id: EditorId) -> Option<&MemoryEditor> {
        self.editors.get(&id)
    }

    fn editor_mut(&mut self, id: EditorId) -> Option<&mut MemoryEditor> {
        self.editors.get_mut(&id)
    }

    fn config(&self) -> &dyn ConfigSource {
        &self.settings
    }

    fn theme(&self) -> &dyn ThemeProvider {
        &self.theme
    }
}

impl EventSource for Workspace {
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId {
        self.next_subscription_id += 1;
        let id = SubscriptionId(self.next_subscription_id);
        self.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }
}
