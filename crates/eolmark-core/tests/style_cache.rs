use eolmark_core::{
    DecorationEngine, EffectiveSettings, LineEnding, MarkerCategory, RenderWhitespace,
    RopeDocument, ThemeColors, Workbench, Workspace,
};

fn all_with_whitespace() -> EffectiveSettings {
    EffectiveSettings {
        render_whitespace: RenderWhitespace::All,
        default_eol: LineEnding::Lf,
        highlight_extra_whitespace: true,
        ..EffectiveSettings::default()
    }
}

#[test]
fn test_identical_refreshes_reuse_styles() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("fn main() {}  \n"));
    let mut engine = DecorationEngine::new();
    let settings = all_with_whitespace();

    for _ in 0..5 {
        engine
            .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
            .unwrap();
    }

    let editor = ws.editor(id).unwrap();
    assert_eq!(editor.created_style_count(), 2);
    assert_eq!(editor.disposed_style_count(), 0);
}

#[test]
fn test_scrolling_does_not_recreate_styles() {
    let text: String = (0..200).map(|i| format!("{i}\n")).collect();
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text(&text));
    let mut engine = DecorationEngine::new();
    let settings = all_with_whitespace();

    for top in (0..180).step_by(20) {
        ws.scroll_to(id, top, 20);
        engine
            .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
            .unwrap();
    }

    assert_eq!(ws.editor(id).unwrap().created_style_count(), 2);
}

#[test]
fn test_glyph_change_recreates_only_the_end_of_line_style() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\n"));
    let mut engine = DecorationEngine::new();
    let mut settings = all_with_whitespace();

    engine
        .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
        .unwrap();
    let trailing = engine
        .style_handle(id, MarkerCategory::TrailingWhitespace)
        .unwrap();

    settings.glyphs.lf = "$".to_string();
    engine
        .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
        .unwrap();

    let editor = ws.editor(id).unwrap();
    assert_eq!(editor.created_style_count(), 3);
    assert_eq!(
        engine.style_handle(id, MarkerCategory::TrailingWhitespace),
        Some(trailing)
    );
    let eol = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    assert_eq!(editor.style(eol).unwrap().content_text(), Some("$"));
}

#[test]
fn test_line_ending_change_switches_glyph() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\nb\n"));
    let mut engine = DecorationEngine::new();
    let settings = all_with_whitespace();

    engine
        .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
        .unwrap();
    ws.set_line_ending(id, LineEnding::Crlf);
    engine
        .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
        .unwrap();

    let eol = engine.style_handle(id, MarkerCategory::EndOfLine).unwrap();
    let editor = ws.editor(id).unwrap();
    assert_eq!(editor.style(eol).unwrap().content_text(), Some("↵"));
    assert_eq!(editor.live_style_count(), 2);
}

#[test]
fn test_each_editor_owns_its_styles() {
    let mut ws = Workspace::new();
    let lf = ws.open_editor(RopeDocument::from_text("a\nb\n"));
    let crlf = ws.open_editor(RopeDocument::from_text("a\r\nb\r\n"));
    let mut engine = DecorationEngine::new();
    let settings = all_with_whitespace();

    for _ in 0..3 {
        for id in [lf, crlf] {
            engine
                .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
                .unwrap();
        }
    }

    for id in [lf, crlf] {
        assert_eq!(ws.editor(id).unwrap().created_style_count(), 2);
    }
    assert_eq!(engine.tracked_editors(), vec![lf, crlf]);

    let lf_style = engine.style_handle(lf, MarkerCategory::EndOfLine).unwrap();
    let crlf_style = engine.style_handle(crlf, MarkerCategory::EndOfLine).unwrap();
    assert_eq!(
        ws.editor(lf).unwrap().style(lf_style).unwrap().content_text(),
        Some("↓")
    );
    assert_eq!(
        ws.editor(crlf)
            .unwrap()
            .style(crlf_style)
            .unwrap()
            .content_text(),
        Some("↵")
    );
}

#[test]
fn test_forget_editor_drops_cached_handles() {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text("a\n"));
    let mut engine = DecorationEngine::new();
    let settings = all_with_whitespace();

    engine
        .refresh(ws.editor_mut(id), None, &settings, &ThemeColors::default())
        .unwrap();
    assert!(ws.close_editor(id));
    assert!(engine.forget_editor(id));
    assert!(!engine.forget_editor(id));
    assert!(engine.style_handle(id, MarkerCategory::EndOfLine).is_none());
    assert!(engine.tracked_editors().is_empty());
}
