//! Decoration refresh engine.
//!
//! On every refresh the engine:
//!
//! 1. derives the end-of-line marker style (glyph, color, placement) from the effective
//!    settings, the document's line ending and the current theme colors
//! 2. recreates the editor's style handles only if that style differs from the one they were
//!    created with
//! 3. rescans the smallest line span covering the visible (or changed) ranges
//! 4. replaces all decorations of each style handle in one call
//!
//! Settings and theme colors arrive as immutable snapshots; the only state the engine keeps is
//! the per-editor style-handle cache.

use crate::decorations::{DecorationPlacement, DecorationStyle, MarkerCategory, StyleHandle};
use crate::document::TextDocument;
use crate::host::{EditorId, EditorView};
use crate::position::{Position, Selection, TextRange};
use crate::theme::{Color, ThemeColors};
use crate::whitespace::TrailingWhitespace;
use eolmark_config::EffectiveSettings;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Markers computed for one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    /// The scanned line span, or `None` if nothing was scanned.
    pub scanned: Option<RangeInclusive<usize>>,
    /// Zero-width ranges at line ends.
    pub end_of_line: Vec<TextRange>,
    /// Trailing whitespace runs.
    pub trailing_whitespace: Vec<TextRange>,
}

/// The lines to rescan for `ranges`.
///
/// The union of `ranges` is widened by one line before its start (an edit may affect the
/// previous line) and two lines past its end (wrapped or partially visible last lines), then
/// clamped to the document. Returns `None` for an empty range list.
pub fn line_span<D: TextDocument + ?Sized>(
    document: &D,
    ranges: &[TextRange],
) -> Option<RangeInclusive<usize>> {
    let (first, rest) = ranges.split_first()?;

    let mut start = document.offset_at(first.start);
    let mut end = document.offset_at(first.end);
    for range in rest {
        start = start.min(document.offset_at(range.start));
        end = end.max(document.offset_at(range.end));
    }

    let start_line = document.position_at(start).line.saturating_sub(1);
    let end_line = document
        .validate_position(document.position_at(end).translate(2, 0))
        .line;

    Some(start_line..=end_line)
}

/// Compute the markers for the lines covering `ranges`.
///
/// The span's last line gets no end-of-line marker, since its line break may not be fully
/// visible; it is still checked for trailing whitespace.
pub fn scan_markers<D: TextDocument + ?Sized>(
    document: &D,
    selections: &[Selection],
    ranges: &[TextRange],
    settings: &EffectiveSettings,
    scanner: &TrailingWhitespace,
) -> MarkerSet {
    let Some(lines) = line_span(document, ranges) else {
        return MarkerSet::default();
    };

    let selection_only = settings.render_whitespace.selection_only();
    let last_line = *lines.end();
    let mut end_of_line = Vec::new();
    let mut trailing_whitespace = Vec::new();

    for number in lines.clone() {
        let Some(line) = document.line_at(number) else {
            break;
        };

        if number != last_line {
            let eol = line.range.end;
            let mut decorate = if selection_only {
                selections
                    .iter()
                    .any(|selection| !selection.is_empty() && selection.contains_inclusive(eol))
            } else {
                true
            };

            // A `before` marker on an empty line would shift the caret.
            if decorate && settings.decorate_before_eol && line.is_empty() {
                decorate = false;
            }

            if decorate {
                end_of_line.push(TextRange::point(eol));
            }
        }

        if settings.highlight_extra_whitespace
            && let Some(column) = scanner.find(&line.text)
        {
            trailing_whitespace.push(TextRange::new(
                Position::new(number, column),
                line.range.end,
            ));
        }
    }

    MarkerSet {
        scanned: Some(lines),
        end_of_line,
        trailing_whitespace,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EndOfLineKey {
    glyph: String,
    color: Color,
    placement: DecorationPlacement,
    error: Color,
    whitespace: Color,
}

#[derive(Debug)]
struct CachedStyle<K> {
    handle: StyleHandle,
    key: K,
}

#[derive(Debug, Default)]
struct EditorStyles {
    end_of_line: Option<CachedStyle<EndOfLineKey>>,
    trailing_whitespace: Option<CachedStyle<Color>>,
}

impl EditorStyles {
    fn handle(&self, category: MarkerCategory) -> Option<StyleHandle> {
        match category {
            MarkerCategory::EndOfLine => self.end_of_line.as_ref().map(|c| c.handle),
            MarkerCategory::TrailingWhitespace => {
                self.trailing_whitespace.as_ref().map(|c| c.handle)
            }
        }
    }
}

/// Computes and submits end-of-line and trailing-whitespace decorations.
///
/// ```rust
/// use eolmark_core::{
///     DecorationEngine, EffectiveSettings, MarkerCategory, Position, RenderWhitespace,
///     RopeDocument, TextRange, ThemeColors, Workbench, Workspace,
/// };
///
/// let mut workspace = Workspace::new();
/// let id = workspace.open_editor(RopeDocument::from_text("a\nb\nc\n"));
///
/// let settings = EffectiveSettings {
///     render_whitespace: RenderWhitespace::All,
///     ..EffectiveSettings::default()
/// };
/// let mut engine = DecorationEngine::new();
/// engine
///     .refresh(workspace.editor_mut(id), None, &settings, &ThemeColors::default())
///     .unwrap();
///
/// let handle = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
/// let editor = workspace.editor(id).unwrap();
/// assert_eq!(editor.decorations(handle)[0], TextRange::point(Position::new(0, 1)));
/// ```
pub struct DecorationEngine {
    editors: HashMap<EditorId, EditorStyles>,
    trailing: TrailingWhitespace,
}

impl DecorationEngine {
    /// Create an engine with no cached styles.
    pub fn new() -> Self {
        Self {
            editors: HashMap::new(),
            trailing: TrailingWhitespace::new(),
        }
    }

    /// Redecorate `editor`.
    ///
    /// `changed_ranges` restricts the rescan to the given ranges (e.g. the ranges a scroll
    /// revealed); otherwise the editor's visible ranges are used. A missing editor or an empty
    /// range list is a no-op.
    pub fn refresh<E: EditorView + ?Sized>(
        &mut self,
        editor: Option<&mut E>,
        changed_ranges: Option<&[TextRange]>,
        settings: &EffectiveSettings,
        theme: &ThemeColors,
    ) -> Result<(), E::Error> {
        let Some(editor) = editor else {
            return Ok(());
        };
        let id = editor.id();

        let line_ending = editor.document().line_ending();
        let color = if settings.highlight_non_default && settings.is_non_default(line_ending) {
            theme.error
        } else {
            theme.whitespace
        };
        let placement = if settings.decorate_before_eol {
            DecorationPlacement::Before
        } else {
            DecorationPlacement::After
        };
        let key = EndOfLineKey {
            glyph: settings.glyphs.for_line_ending(line_ending).to_string(),
            color,
            placement,
            error: theme.error,
            whitespace: theme.whitespace,
        };

        let styles = self.editors.entry(id).or_default();
        let eol_handle = ensure_style(
            editor,
            &mut styles.end_of_line,
            key,
            MarkerCategory::EndOfLine,
            |key| DecorationStyle::marker(key.glyph.clone(), key.color, key.placement),
        )?;
        let trailing_handle = if settings.highlight_extra_whitespace {
            Some(ensure_style(
                editor,
                &mut styles.trailing_whitespace,
                theme.error,
                MarkerCategory::TrailingWhitespace,
                |color| DecorationStyle::foreground(*color),
            )?)
        } else {
            if let Some(old) = styles.trailing_whitespace.take() {
                dispose(editor, old.handle)?;
            }
            None
        };

        let markers = if settings.render_whitespace.renders_end_of_line() {
            let ranges = match changed_ranges {
                Some(ranges) => ranges,
                None => editor.visible_ranges(),
            };
            if ranges.is_empty() {
                trace!(editor = ?id, "no visible ranges, skipping refresh");
                return Ok(());
            }
            scan_markers(
                editor.document(),
                editor.selections(),
                ranges,
                settings,
                &self.trailing,
            )
        } else {
            MarkerSet::default()
        };

        trace!(
            editor = ?id,
            lines = ?markers.scanned,
            end_of_line = markers.end_of_line.len(),
            trailing_whitespace = markers.trailing_whitespace.len(),
            "refreshed decorations"
        );

        editor.set_decorations(eol_handle, &markers.end_of_line)?;
        if let Some(handle) = trailing_handle {
            editor.set_decorations(handle, &markers.trailing_whitespace)?;
        }
        Ok(())
    }

    /// The style handle currently cached for `editor` and `category`.
    pub fn style_handle(&self, editor: EditorId, category: MarkerCategory) -> Option<StyleHandle> {
        self.editors.get(&editor)?.handle(category)
    }

    /// Editors that currently own cached style handles.
    pub fn tracked_editors(&self) -> Vec<EditorId> {
        let mut ids: Vec<EditorId> = self.editors.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Drop the cached handles of an editor the host has already closed.
    ///
    /// Returns `true` if the editor was tracked.
    pub fn forget_editor(&mut self, editor: EditorId) -> bool {
        let tracked = self.editors.remove(&editor).is_some();
        if tracked {
            debug!(?editor, "forgot styles of closed editor");
        }
        tracked
    }

    /// Clear and dispose every style handle owned by `editor`.
    pub fn release<E: EditorView + ?Sized>(&mut self, editor: &mut E) -> Result<(), E::Error> {
        let Some(styles) = self.editors.remove(&editor.id()) else {
            return Ok(());
        };
        let handles = [
            styles.end_of_line.map(|c| c.handle),
            styles.trailing_whitespace.map(|c| c.handle),
        ];
        for handle in handles.into_iter().flatten() {
            dispose(editor, handle)?;
        }
        debug!(editor = ?editor.id(), "released decoration styles");
        Ok(())
    }
}

impl Default for DecorationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn dispose<E: EditorView + ?Sized>(editor: &mut E, handle: StyleHandle) -> Result<(), E::Error> {
    editor.set_decorations(handle, &[])?;
    editor.dispose_style(handle)
}

fn ensure_style<E, K>(
    editor: &mut E,
    slot: &mut Option<CachedStyle<K>>,
    key: K,
    category: MarkerCategory,
    style: impl FnOnce(&K) -> DecorationStyle,
) -> Result<StyleHandle, E::Error>
where
    E: EditorView + ?Sized,
    K: PartialEq + fmt::Debug,
{
    if let Some(cached) = slot.as_ref()
        && cached.key == key
    {
        return Ok(cached.handle);
    }

    if let Some(old) = slot.take() {
        dispose(editor, old.handle)?;
    }

    let handle = editor.create_style(style(&key))?;
    debug!(editor = ?editor.id(), ?category, ?handle, ?key, "created decoration style");
    *slot = Some(CachedStyle { handle, key });
    Ok(handle)
}
