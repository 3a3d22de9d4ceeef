//! Editor lifecycle events and subscriptions.

use crate::host::EditorId;
use crate::position::{Selection, TextRange};

/// The named event types the extension listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// The focused editor changed.
    ActiveEditorChanged,
    /// An editor's selections changed.
    SelectionChanged,
    /// An editor scrolled or resized.
    VisibleRangesChanged,
    /// The set of shown editors changed.
    VisibleEditorsChanged,
    /// A document was edited.
    DocumentChanged,
    /// Configuration changed.
    ConfigurationChanged,
    /// An editor was closed.
    EditorClosed,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [Self; 7] = [
        Self::ActiveEditorChanged,
        Self::SelectionChanged,
        Self::VisibleRangesChanged,
        Self::VisibleEditorsChanged,
        Self::DocumentChanged,
        Self::ConfigurationChanged,
        Self::EditorClosed,
    ];
}

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The focused editor changed (`None` when no editor has focus).
    ActiveEditorChanged(Option<EditorId>),
    /// An editor's selections changed.
    SelectionChanged {
        /// Target editor.
        editor: EditorId,
        /// The new selections.
        selections: Vec<Selection>,
    },
    /// An editor's visible ranges changed.
    VisibleRangesChanged {
        /// Target editor.
        editor: EditorId,
        /// The new visible ranges.
        visible_ranges: Vec<TextRange>,
    },
    /// The set of shown editors changed.
    VisibleEditorsChanged(Vec<EditorId>),
    /// The document shown in `editor` was edited.
    DocumentChanged {
        /// Target editor.
        editor: EditorId,
    },
    /// Configuration changed.
    ConfigurationChanged,
    /// An editor was closed and no longer exists.
    EditorClosed(EditorId),
}

impl EditorEvent {
    /// The event's kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ActiveEditorChanged(_) => EventKind::ActiveEditorChanged,
            Self::SelectionChanged { .. } => EventKind::SelectionChanged,
            Self::VisibleRangesChanged { .. } => EventKind::VisibleRangesChanged,
            Self::VisibleEditorsChanged(_) => EventKind::VisibleEditorsChanged,
            Self::DocumentChanged { .. } => EventKind::DocumentChanged,
            Self::ConfigurationChanged => EventKind::ConfigurationChanged,
            Self::EditorClosed(_) => EventKind::EditorClosed,
        }
    }
}

/// Identifier of a registered subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Hosts that deliver [`EditorEvent`]s only for subscribed kinds.
pub trait EventSource {
    /// Start delivering events of `kind`.
    fn subscribe(&mut self, kind: EventKind) -> SubscriptionId;

    /// Stop delivering events for a subscription. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// The subscriptions held by one extension instance.
#[derive(Debug, Default)]
pub struct Subscriptions {
    ids: Vec<(EventKind, SubscriptionId)>,
}

impl Subscriptions {
    /// Subscribe to every kind in `kinds`.
    pub fn subscribe_all<S: EventSource + ?Sized>(source: &mut S, kinds: &[EventKind]) -> Self {
        Self {
            ids: kinds
                .iter()
                .map(|&kind| (kind, source.subscribe(kind)))
                .collect(),
        }
    }

    /// The event kinds currently subscribed.
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.ids.iter().map(|(kind, _)| *kind)
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Release every subscription.
    pub fn release<S: EventSource + ?Sized>(&mut self, source: &mut S) {
        for (_, id) in self.ids.drain(..) {
            source.unsubscribe(id);
        }
    }
}
