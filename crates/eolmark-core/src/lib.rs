#![warn(missing_docs)]
//! Eolmark Core - headless end-of-line and trailing-whitespace decorations
//!
//! # Overview
//!
//! `eolmark-core` decides, on every relevant editor event, which end-of-line markers
//! (`↓` for LF, `↵` for CRLF) and trailing-whitespace highlights an editor should show, and
//! submits them to the host as replace-all decoration updates. It never draws anything itself:
//! the hosting editor is modelled as a handful of capability traits.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Event Wiring (EolExtension)                │  ← Host events in
//! ├─────────────────────────────────────────────┤
//! │  Refresh Engine (DecorationEngine)          │  ← Style cache + line scan
//! ├─────────────────────────────────────────────┤
//! │  Settings Resolver (eolmark-config)         │  ← Global + [language] merge
//! ├─────────────────────────────────────────────┤
//! │  Host Capabilities                          │  ← Workbench / EditorView /
//! │                                             │    TextDocument / ThemeProvider
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use eolmark_core::{
//!     EolExtension, JsonSettings, MarkerCategory, RopeDocument, Workbench, Workspace,
//! };
//!
//! let settings: JsonSettings = r#"{
//!     "editor.renderWhitespace": "all",
//!     "files.eol": "\n",
//!     "code-eol.highlightExtraWhitespace": true
//! }"#
//! .parse()
//! .unwrap();
//!
//! let mut workspace = Workspace::with_settings(settings);
//! let id = workspace.open_editor(RopeDocument::from_text("let x = 1;  \nlet y = 2;\n"));
//! let mut extension = EolExtension::activate(&mut workspace).unwrap();
//!
//! let editor = workspace.editor(id).unwrap();
//! let trailing = extension
//!     .engine()
//!     .style_handle(id, MarkerCategory::TrailingWhitespace)
//!     .unwrap();
//! assert_eq!(editor.decorations(trailing).len(), 1);
//!
//! // Hosts forward their events; the in-memory workspace queues them.
//! workspace.scroll_to(id, 1, 10);
//! for event in workspace.take_events() {
//!     extension.handle_event(&mut workspace, event).unwrap();
//! }
//! ```
//!
//! # Module Description
//!
//! - [`engine`] - the refresh engine and its line-span computation
//! - [`extension`] - event wiring around the engine and the settings resolver
//! - [`host`] - editor and workbench capabilities
//! - [`document`] - the document capability and a rope-backed implementation
//! - [`theme`] - colors and theme lookup
//! - [`workspace`] - an in-memory host implementing every capability

pub mod decorations;
pub mod document;
pub mod engine;
pub mod events;
pub mod extension;
pub mod host;
pub mod line_ending;
mod position;
pub mod theme;
mod whitespace;
pub mod workspace;

pub use decorations::{DecorationPlacement, DecorationStyle, MarkerCategory, StyleHandle};
pub use document::{Line, RopeDocument, TextDocument};
pub use engine::{DecorationEngine, MarkerSet, line_span, scan_markers};
pub use events::{EditorEvent, EventKind, EventSource, SubscriptionId, Subscriptions};
pub use extension::EolExtension;
pub use host::{EditorId, EditorView, HostError, Workbench};
pub use line_ending::LineEnding;
pub use position::{Position, Selection, SelectionDirection, TextRange};
pub use theme::{Color, StaticTheme, ThemeColors, ThemeError, ThemeProvider};
pub use whitespace::TrailingWhitespace;
pub use workspace::{MemoryEditor, Workspace, viewport_range};

pub use eolmark_config::{
    ConfigError, ConfigSource, EffectiveSettings, GlobalSettings, JsonSettings, RenderWhitespace,
    SettingsResolver,
};
