use eolmark_core::theme::{DEFAULT_ERROR_COLOR, DEFAULT_WHITESPACE_COLOR, ERROR_FOREGROUND};
use eolmark_core::{
    Color, DecorationEngine, DecorationPlacement, EditorId, EffectiveSettings, LineEnding,
    MarkerCategory, MemoryEditor, Position, RenderWhitespace, RopeDocument, Selection,
    StaticTheme, TextRange, ThemeColors, Workbench, Workspace,
};

fn settings(mode: RenderWhitespace) -> EffectiveSettings {
    EffectiveSettings {
        render_whitespace: mode,
        default_eol: LineEnding::Lf,
        ..EffectiveSettings::default()
    }
}

fn refresh(
    ws: &mut Workspace,
    engine: &mut DecorationEngine,
    id: EditorId,
    settings: &EffectiveSettings,
) {
    engine
        .refresh(ws.editor_mut(id), None, settings, &ThemeColors::default())
        .unwrap();
}

fn decorations(
    ws: &Workspace,
    engine: &DecorationEngine,
    id: EditorId,
    category: MarkerCategory,
) -> Vec<TextRange> {
    let handle = engine.style_handle(id, category).unwrap();
    ws.editor(id).unwrap().decorations(handle).to_vec()
}

fn points(positions: &[(usize, usize)]) -> Vec<TextRange> {
    positions
        .iter()
        .map(|&(line, column)| TextRange::point(Position::new(line, column)))
        .collect()
}

#[test]
fn test_non_default_detection() {
    let settings = settings(RenderWhitespace::All);
    assert!(!settings.is_non_default(LineEnding::Lf));
    assert!(settings.is_non_default(LineEnding::Crlf));

    let crlf = EffectiveSettings {
        default_eol: LineEnding::Crlf,
        ..settings
    };
    assert!(crlf.is_non_default(LineEnding::Lf));
}

#[test]
fn test_viewport_scan_with_five_lines() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("zero\none\ntwo\nthree\nfour"));
    ws.set_visible_ranges(
        id,
        vec![TextRange::new(Position::new(0, 0), Position::new(2, 3))],
    );

    let mut engine = DecorationEngine::new();
    refresh(&mut ws, &mut engine, id, &settings(RenderWhitespace::All));

    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
        points(&[(0, 4), (1, 3), (2, 3), (3, 5)])
    );

    let handle = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    let style = ws.editor(id).unwrap().style(handle).unwrap();
    assert_eq!(style.content_text(), Some("↓"));
    assert_eq!(style.color(), DEFAULT_WHITESPACE_COLOR);
}

#[test]
fn test_render_mode_none_produces_no_markers() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a  \nb\nc\n"));
    let mut engine = DecorationEngine::new();

    let mut settings = settings(RenderWhitespace::All);
    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine).len(),
        3
    );

    settings.render_whitespace = RenderWhitespace::None;
    settings.highlight_extra_whitespace = true;
    refresh(&mut ws, &mut engine, id, &settings);
    assert!(decorations(&ws, &engine, id, MarkerCategory::EndOfLine).is_empty());
    assert!(decorations(&ws, &engine, id, MarkerCategory::TrailingWhitespace).is_empty());
}

#[test]
fn test_boundary_and_trailing_modes_render_markers() {
    for mode in [RenderWhitespace::Boundary, RenderWhitespace::Trailing] {
        let mut ws = Workspace::new();
        let id = ws.open_editor(RopeDocument::from_text("a\nb\n"));
        let mut engine = DecorationEngine::new();
        refresh(&mut ws, &mut engine, id, &settings(mode));
        assert_eq!(
            decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
            points(&[(0, 1), (1, 1)])
        );
    }
}

#[test]
fn test_selection_mode_marks_only_selected_line_ends() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("one\ntwo\nthree\nfour\n"));
    let mut engine = DecorationEngine::new();
    let settings = settings(RenderWhitespace::Selection);

    // Only a caret: nothing is selected.
    refresh(&mut ws, &mut engine, id, &settings);
    assert!(decorations(&ws, &engine, id, MarkerCategory::EndOfLine).is_empty());

    // Backward selection from the middle of line 2 up to the middle of line 0.
    ws.set_selections(
        id,
        vec![Selection::new(Position::new(2, 2), Position::new(0, 1))],
    );
    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
        points(&[(0, 3), (1, 3)])
    );

    // No selections at all.
    ws.set_selections(id, Vec::new());
    refresh(&mut ws, &mut engine, id, &settings);
    assert!(decorations(&ws, &engine, id, MarkerCategory::EndOfLine).is_empty());
}

#[test]
fn test_decorate_before_eol_skips_empty_lines() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\n\nb\n\n"));
    let mut engine = DecorationEngine::new();

    let mut settings = settings(RenderWhitespace::All);
    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
        points(&[(0, 1), (1, 0), (2, 1), (3, 0)])
    );

    settings.decorate_before_eol = true;
    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
        points(&[(0, 1), (2, 1)])
    );

    let handle = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    let style = ws.editor(id).unwrap().style(handle).unwrap().clone();
    assert_eq!(
        style,
        eolmark_core::DecorationStyle::marker("↓", DEFAULT_WHITESPACE_COLOR, DecorationPlacement::Before)
    );
}

#[test]
fn test_trailing_whitespace_ranges() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("abc   \nabc\n\t\nx"));
    let mut engine = DecorationEngine::new();

    let settings = EffectiveSettings {
        highlight_extra_whitespace: true,
        ..settings(RenderWhitespace::All)
    };
    refresh(&mut ws, &mut engine, id, &settings);

    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::TrailingWhitespace),
        vec![
            TextRange::new(Position::new(0, 3), Position::new(0, 6)),
            TextRange::new(Position::new(2, 0), Position::new(2, 1)),
        ]
    );

    let handle = engine
        .style_handle(id, MarkerCategory::TrailingWhitespace)
        .unwrap();
    assert_eq!(
        ws.editor(id).unwrap().style(handle).unwrap().color(),
        DEFAULT_ERROR_COLOR
    );
}

#[test]
fn test_disabling_trailing_whitespace_disposes_its_style() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("abc  \n"));
    let mut engine = DecorationEngine::new();

    let mut settings = settings(RenderWhitespace::All);
    refresh(&mut ws, &mut engine, id, &settings);
    assert!(
        engine
            .style_handle(id, MarkerCategory::TrailingWhitespace)
            .is_none()
    );

    settings.highlight_extra_whitespace = true;
    refresh(&mut ws, &mut engine, id, &settings);
    let handle = engine
        .style_handle(id, MarkerCategory::TrailingWhitespace)
        .unwrap();
    assert_eq!(ws.editor(id).unwrap().decorations(handle).len(), 1);

    settings.highlight_extra_whitespace = false;
    refresh(&mut ws, &mut engine, id, &settings);
    let editor = ws.editor(id).unwrap();
    assert!(editor.style(handle).is_none());
    assert!(editor.decorations(handle).is_empty());
    assert!(
        engine
            .style_handle(id, MarkerCategory::TrailingWhitespace)
            .is_none()
    );
}

#[test]
fn test_highlight_non_default_switches_color_not_glyph() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\r\nb\r\nc\r\n"));
    let mut engine = DecorationEngine::new();

    let mut settings = settings(RenderWhitespace::All);
    refresh(&mut ws, &mut engine, id, &settings);
    let before = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    let style = ws.editor(id).unwrap().style(before).unwrap().clone();
    assert_eq!(style.content_text(), Some("↵"));
    assert_eq!(style.color(), DEFAULT_WHITESPACE_COLOR);

    settings.highlight_non_default = true;
    refresh(&mut ws, &mut engine, id, &settings);
    let after = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    assert_ne!(before, after);

    let editor = ws.editor(id).unwrap();
    let style = editor.style(after).unwrap();
    assert_eq!(style.content_text(), Some("↵"));
    assert_eq!(style.color(), DEFAULT_ERROR_COLOR);
    assert!(editor.style(before).is_none());
    assert_eq!(editor.decorations(after).len(), 3);
}

#[test]
fn test_highlight_non_default_ignores_default_endings() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\nb\n"));
    let mut engine = DecorationEngine::new();

    let settings = EffectiveSettings {
        highlight_non_default: true,
        ..settings(RenderWhitespace::All)
    };
    refresh(&mut ws, &mut engine, id, &settings);
    let handle = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    assert_eq!(
        ws.editor(id).unwrap().style(handle).unwrap().color(),
        DEFAULT_WHITESPACE_COLOR
    );
}

#[test]
fn test_changed_ranges_restrict_the_scan() {
    let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text(&text));
    let mut engine = DecorationEngine::new();

    let changed = [TextRange::new(Position::new(20, 0), Position::new(21, 0))];
    engine
        .refresh(
            ws.editor_mut(id),
            Some(&changed),
            &settings(RenderWhitespace::All),
            &ThemeColors::default(),
        )
        .unwrap();

    let lines: Vec<usize> = decorations(&ws, &engine, id, MarkerCategory::EndOfLine)
        .iter()
        .map(|r| r.start.line)
        .collect();
    assert_eq!(lines, vec![19, 20, 21, 22]);
}

#[test]
fn test_empty_ranges_leave_decorations_untouched() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\nb\nc\n"));
    let mut engine = DecorationEngine::new();
    let settings = settings(RenderWhitespace::All);

    refresh(&mut ws, &mut engine, id, &settings);
    let shown = decorations(&ws, &engine, id, MarkerCategory::EndOfLine);
    assert_eq!(shown.len(), 3);

    engine
        .refresh(ws.editor_mut(id), Some(&[]), &settings, &ThemeColors::default())
        .unwrap();
    assert_eq!(decorations(&ws, &engine, id, MarkerCategory::EndOfLine), shown);

    ws.set_visible_ranges(id, Vec::new());
    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(decorations(&ws, &engine, id, MarkerCategory::EndOfLine), shown);
}

#[test]
fn test_missing_editor_is_a_noop() {
    let mut engine = DecorationEngine::new();
    engine
        .refresh::<MemoryEditor>(
            None,
            None,
            &settings(RenderWhitespace::All),
            &ThemeColors::default(),
        )
        .unwrap();
    assert!(engine.tracked_editors().is_empty());
}

#[test]
fn test_theme_change_recreates_styles() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a \n"));
    let mut engine = DecorationEngine::new();
    let settings = EffectiveSettings {
        highlight_extra_whitespace: true,
        ..settings(RenderWhitespace::All)
    };

    refresh(&mut ws, &mut engine, id, &settings);
    assert_eq!(ws.editor(id).unwrap().created_style_count(), 2);

    let red = Color::rgb(0xFF, 0, 0);
    ws.set_theme(StaticTheme::new().with(ERROR_FOREGROUND, red));
    let theme = ThemeColors::resolve(ws.static_theme());
    engine
        .refresh(ws.editor_mut(id), None, &settings, &theme)
        .unwrap();

    let editor = ws.editor(id).unwrap();
    // Both keys include the error color.
    assert_eq!(editor.created_style_count(), 4);
    assert_eq!(editor.disposed_style_count(), 2);
    assert_eq!(editor.live_style_count(), 2);

    let trailing = engine
        .style_handle(id, MarkerCategory::TrailingWhitespace)
        .unwrap();
    assert_eq!(editor.style(trailing).unwrap().color(), red);
}

#[test]
fn test_release_disposes_every_style() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a \n"));
    let mut engine = DecorationEngine::new();
    let settings = EffectiveSettings {
        highlight_extra_whitespace: true,
        ..settings(RenderWhitespace::All)
    };
    refresh(&mut ws, &mut engine, id, &settings);

    engine.release(ws.editor_mut(id).unwrap()).unwrap();
    let editor = ws.editor(id).unwrap();
    assert_eq!(editor.live_style_count(), 0);
    assert_eq!(editor.disposed_style_count(), 2);
    assert!(engine.tracked_editors().is_empty());
}

#[test]
fn test_form_feed_and_unicode_separators_are_not_line_endings() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\x0cb\u{2028}c\nd\n"));
    let mut engine = DecorationEngine::new();

    let settings = EffectiveSettings {
        highlight_extra_whitespace: true,
        ..settings(RenderWhitespace::All)
    };
    refresh(&mut ws, &mut engine, id, &settings);

    assert_eq!(
        decorations(&ws, &engine, id, MarkerCategory::EndOfLine),
        points(&[(0, 5), (1, 1)])
    );
    assert!(decorations(&ws, &engine, id, MarkerCategory::TrailingWhitespace).is_empty());
}
