use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use eolmark_core::{
    DecorationEngine, EffectiveSettings, EolExtension, JsonSettings, LineEnding, Position,
    RenderWhitespace, RopeDocument, Selection, SettingsResolver, TextRange, ThemeColors,
    Workbench, Workspace, line_span,
};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        // Every third line carries trailing whitespace.
        let tail = if i % 3 == 0 { "   " } else { "" };
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog{tail}\n"
        ));
    }
    out
}

fn settings(mode: RenderWhitespace) -> EffectiveSettings {
    EffectiveSettings {
        render_whitespace: mode,
        default_eol: LineEnding::Lf,
        highlight_extra_whitespace: true,
        ..EffectiveSettings::default()
    }
}

fn bench_viewport_refresh(c: &mut Criterion) {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text(&large_text(50_000)));
    ws.scroll_to(id, 25_000, 60);

    let mut engine = DecorationEngine::new();
    let settings = settings(RenderWhitespace::All);
    let theme = ThemeColors::default();

    c.bench_function("viewport_refresh/60_lines", |b| {
        b.iter(|| {
            engine
                .refresh(ws.editor_mut(id), None, black_box(&settings), &theme)
                .unwrap();
        })
    });
}

fn bench_selection_refresh(c: &mut Criterion) {
    let mut ws = Workspace::new();
    let id = ws.open_editor(RopeDocument::from_text(&large_text(50_000)));
    ws.scroll_to(id, 25_000, 60);
    ws.set_selections(
        id,
        vec![Selection::new(
            Position::new(25_010, 4),
            Position::new(25_040, 0),
        )],
    );

    let mut engine = DecorationEngine::new();
    let settings = settings(RenderWhitespace::Selection);
    let theme = ThemeColors::default();

    c.bench_function("selection_refresh/60_lines", |b| {
        b.iter(|| {
            engine
                .refresh(ws.editor_mut(id), None, black_box(&settings), &theme)
                .unwrap();
        })
    });
}

fn bench_line_span_many_ranges(c: &mut Criterion) {
    let doc = RopeDocument::from_text(&large_text(50_000));
    let ranges: Vec<TextRange> = (0..32)
        .map(|i| {
            let line = 10_000 + i * 40;
            TextRange::new(Position::new(line, 0), Position::new(line + 20, 0))
        })
        .collect();

    c.bench_function("line_span/32_ranges", |b| {
        b.iter(|| black_box(line_span(&doc, black_box(&ranges))))
    });
}

fn bench_scroll_through_file(c: &mut Criterion) {
    let text = large_text(10_000);
    let mut config = JsonSettings::new();
    config.set("editor.renderWhitespace", "all");
    config.set("code-eol.highlightExtraWhitespace", true);

    c.bench_function("scroll_through/10k_lines", |b| {
        b.iter_batched(
            || {
                let mut ws = Workspace::with_settings(config.clone());
                let id = ws.open_editor(RopeDocument::from_text(&text));
                let extension =
                    EolExtension::activate_with(&mut ws, SettingsResolver::with_native(LineEnding::Lf))
                        .unwrap();
                (ws, id, extension)
            },
            |(mut ws, id, mut extension)| {
                for top in (0..10_000).step_by(50) {
                    ws.scroll_to(id, top, 50);
                    for event in ws.take_events() {
                        extension.handle_event(&mut ws, event).unwrap();
                    }
                }
                black_box(extension.engine().tracked_editors());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_viewport_refresh,
    bench_selection_refresh,
    bench_line_span_many_ranges,
    bench_scroll_through_file
);
criterion_main!(benches);
