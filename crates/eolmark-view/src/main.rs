//! Terminal viewer for eolmark decorations
//!
//! Opens a file in a minimal crossterm/ratatui editor and hosts the `eolmark-core` extension
//! over it: every keystroke that moves the caret, scrolls, edits or changes settings is turned
//! into an editor event and handed to the extension, and the resulting decorations are drawn.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p eolmark-view -- <file_path> [settings.json]
//! ```
//!
//! `settings.json` uses the VS Code shape (`"editor.renderWhitespace": "all"`,
//! `"[markdown]": { ... }`). Set `EOLMARK_THEME` to a theme JSON file
//! (`{ "colors": { "errorForeground": "#ff0000" } }`) to override colors, and `EOLMARK_LOG`
//! to a file path to write `tracing` output there (filtered by `RUST_LOG`).
//!
//! # Keys
//!
//! - Arrows / Home / End: move the caret
//! - Shift+arrows: select text
//! - PageUp/PageDown: scroll
//! - Typing, Enter, Tab, Backspace: edit
//! - Ctrl+W: cycle `editor.renderWhitespace`
//! - Ctrl+E: toggle the document's line ending (LF/CRLF)
//! - Ctrl+R: reload the settings file
//! - Ctrl+S: save
//! - Ctrl+Q: quit

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eolmark_config::keys;
use eolmark_core::{
    Color as MarkerColor, DecorationPlacement, DecorationStyle, EditorId, EditorView, EolExtension,
    JsonSettings, LineEnding, Position, RopeDocument, Selection, StaticTheme, TextDocument,
    TextRange, Workbench, Workspace,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position as CursorPosition, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    collections::HashMap,
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    process,
    sync::Mutex,
    time::Duration,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;
const BACKGROUND: MarkerColor = MarkerColor::rgb(0x1E, 0x1E, 0x1E);
const SELECTION_BACKGROUND: Color = Color::Rgb(0x26, 0x4F, 0x78);

fn guess_language_id(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "rs" => "rust",
        "toml" => "toml",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "sh" | "bash" => "shellscript",
        "bat" | "cmd" => "bat",
        "ps1" => "powershell",
        "html" | "htm" => "html",
        "css" => "css",
        _ => "plaintext",
    }
    .to_string()
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

fn cell_width_at(ch: char, x: usize) -> usize {
    if ch == '\t' {
        TAB_WIDTH - x % TAB_WIDTH
    } else {
        char_width(ch)
    }
}

/// Terminal cell for a caret at visual offset `(x, y)` inside a bordered `area`, clamped to
/// the last inner cell. Lines wider than the pane are not scrolled horizontally.
fn cursor_cell(area: Rect, x: usize, y: usize) -> (u16, u16) {
    let inner = |origin: u16, extent: u16, offset: usize| {
        let last = origin.saturating_add(extent.saturating_sub(2));
        origin
            .saturating_add(1)
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
            .min(last)
    };
    (inner(area.x, area.width, x), inner(area.y, area.height, y))
}

fn visual_x_for_column(line: &str, column: usize) -> usize {
    line.chars()
        .take(column)
        .fold(0, |x, ch| x + cell_width_at(ch, x))
}

fn to_terminal_color(color: MarkerColor) -> Color {
    let opaque = color.blend_over(BACKGROUND);
    Color::Rgb(opaque.r, opaque.g, opaque.b)
}

/// Decorations of one line, gathered from the editor's live styles.
#[derive(Debug, Default)]
struct LineDecorations {
    /// `(glyph, color, placement)` anchored at the line end.
    markers: Vec<(String, MarkerColor, DecorationPlacement)>,
    /// `(start_column, end_column, color)`.
    foreground: Vec<(usize, usize, MarkerColor)>,
}

impl LineDecorations {
    fn foreground_at(&self, column: usize) -> Option<MarkerColor> {
        self.foreground
            .iter()
            .find(|(start, end, _)| *start <= column && column < *end)
            .map(|(_, _, color)| *color)
    }
}

fn collect_decorations<'a>(
    rendered: impl Iterator<Item = (&'a DecorationStyle, &'a [TextRange])>,
) -> HashMap<usize, LineDecorations> {
    let mut lines: HashMap<usize, LineDecorations> = HashMap::new();
    for (style, ranges) in rendered {
        for range in ranges {
            let entry = lines.entry(range.start.line).or_default();
            match style {
                DecorationStyle::Marker {
                    content_text,
                    color,
                    placement,
                } => entry
                    .markers
                    .push((content_text.clone(), *color, *placement)),
                DecorationStyle::Foreground { color } => {
                    let end = if range.end.line == range.start.line {
                        range.end.column
                    } else {
                        usize::MAX
                    };
                    entry.foreground.push((range.start.column, end, *color));
                }
            }
        }
    }
    lines
}

/// Build the spans of one line. `selected` reports whether a column is inside the selection.
fn render_line<'a>(
    text: &str,
    decorations: Option<&LineDecorations>,
    selected: impl Fn(usize) -> bool,
) -> Line<'a> {
    let mut spans = Vec::new();
    let mut x = 0usize;

    for (column, ch) in text.chars().enumerate() {
        let width = cell_width_at(ch, x);
        x += width;

        let highlight = decorations.and_then(|d| d.foreground_at(column));
        let shown = match (ch, highlight.is_some()) {
            ('\t', true) => format!("→{}", " ".repeat(width - 1)),
            ('\t', false) => " ".repeat(width),
            (' ', true) => "·".to_string(),
            (c, _) => c.to_string(),
        };

        let mut style = Style::default();
        if let Some(color) = highlight {
            style = style.fg(to_terminal_color(color));
        }
        if selected(column) {
            style = style.bg(SELECTION_BACKGROUND);
        }
        spans.push(Span::styled(shown, style));
    }

    if let Some(decorations) = decorations {
        for (glyph, color, _) in &decorations.markers {
            let mut style = Style::default().fg(to_terminal_color(*color));
            if selected(text.chars().count()) {
                style = style.bg(SELECTION_BACKGROUND);
            }
            spans.push(Span::styled(glyph.clone(), style));
        }
    }

    Line::from(spans)
}

/// Application state
struct App {
    /// In-memory host holding the one open editor
    workspace: Workspace,
    /// The extension; taken on quit to deactivate it
    extension: Option<EolExtension>,
    /// The open editor
    editor: EditorId,
    /// File path
    file_path: PathBuf,
    /// Settings file, reloaded with Ctrl+R
    settings_path: Option<PathBuf>,
    /// Caret position
    caret: Position,
    /// Selection anchor while Shift is held
    anchor: Option<Position>,
    /// First visible line
    scroll_top: usize,
    /// Number of visible lines
    viewport_height: usize,
    /// Unsaved edits
    modified: bool,
    /// Whether to exit
    should_quit: bool,
    /// Status message
    status_message: String,
}

impl App {
    fn new(file_path: PathBuf, settings_path: Option<PathBuf>) -> io::Result<Self> {
        let content = if file_path.exists() {
            fs::read_to_string(&file_path)?
        } else {
            String::new()
        };

        let settings = match &settings_path {
            Some(path) => JsonSettings::load(path).map_err(io::Error::other)?,
            None => JsonSettings::new(),
        };
        let theme = match env::var_os("EOLMARK_THEME") {
            Some(path) => StaticTheme::load(path).map_err(io::Error::other)?,
            None => StaticTheme::new(),
        };

        let language_id = guess_language_id(&file_path);
        let document = RopeDocument::from_text(&content).with_language(language_id.as_str());
        info!(
            path = %file_path.display(),
            language_id = %language_id,
            line_ending = document.line_ending().label(),
            "opened file"
        );

        let mut workspace = Workspace::with_settings(settings).with_theme(theme);
        let editor = workspace.open_editor(document);
        let Ok(extension) = EolExtension::activate(&mut workspace);

        Ok(Self {
            workspace,
            extension: Some(extension),
            editor,
            file_path,
            settings_path,
            caret: Position::default(),
            anchor: None,
            scroll_top: 0,
            viewport_height: 0,
            modified: false,
            should_quit: false,
            status_message: String::new(),
        })
    }

    fn document(&self) -> &RopeDocument {
        match self.workspace.editor(self.editor) {
            Some(editor) => editor.document(),
            None => unreachable!("the viewer's editor is never closed"),
        }
    }

    /// Hand every queued event to the extension.
    fn dispatch_events(&mut self) {
        let Some(extension) = self.extension.as_mut() else {
            return;
        };
        for event in self.workspace.take_events() {
            let Ok(()) = extension.handle_event(&mut self.workspace, event);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status_message.clear();

        let selecting = key.modifiers.contains(KeyModifiers::SHIFT);
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => self.should_quit = true,
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => match self.save_file() {
                Ok(()) => self.status_message = format!("Saved {}", self.file_path.display()),
                Err(e) => self.status_message = format!("Save failed: {e}"),
            },
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => self.cycle_render_whitespace(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => self.toggle_line_ending(),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.reload_settings(),

            (_, KeyCode::Left) => self.move_caret(self.left_of(self.caret), selecting),
            (_, KeyCode::Right) => self.move_caret(self.right_of(self.caret), selecting),
            (_, KeyCode::Up) => {
                let target = Position::new(self.caret.line.saturating_sub(1), self.caret.column);
                self.move_caret(target, selecting);
            }
            (_, KeyCode::Down) => {
                let target = self.caret.translate(1, 0);
                self.move_caret(target, selecting);
            }
            (_, KeyCode::Home) => self.move_caret(Position::new(self.caret.line, 0), selecting),
            (_, KeyCode::End) => {
                self.move_caret(Position::new(self.caret.line, usize::MAX), selecting)
            }
            (_, KeyCode::PageUp) => self.page(false),
            (_, KeyCode::PageDown) => self.page(true),

            (_, KeyCode::Enter) => self.insert_text("\n"),
            (_, KeyCode::Tab) => self.insert_text("\t"),
            (_, KeyCode::Backspace) => self.backspace(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.insert_text(c.encode_utf8(&mut [0; 4]))
            }
            _ => {}
        }

        self.dispatch_events();
    }

    fn left_of(&self, pos: Position) -> Position {
        let doc = self.document();
        let offset = doc.offset_at(pos);
        doc.position_at(offset.saturating_sub(1))
    }

    fn right_of(&self, pos: Position) -> Position {
        let doc = self.document();
        doc.position_at(doc.offset_at(pos) + 1)
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor.unwrap_or(self.caret), self.caret)
    }

    fn move_caret(&mut self, target: Position, selecting: bool) {
        let target = self.document().validate_position(target);
        if selecting {
            self.anchor.get_or_insert(self.caret);
        } else {
            self.anchor = None;
        }
        self.caret = target;

        let selection = self.selection();
        self.workspace
            .set_selections(self.editor, vec![selection]);
        self.follow_caret();
    }

    fn page(&mut self, down: bool) {
        let step = self.viewport_height.max(1);
        let line = if down {
            self.caret.line.saturating_add(step)
        } else {
            self.caret.line.saturating_sub(step)
        };
        self.move_caret(Position::new(line, self.caret.column), false);
    }

    /// Scroll so the caret is visible.
    fn follow_caret(&mut self) {
        let height = self.viewport_height.max(1);
        let mut top = self.scroll_top;
        if self.caret.line < top {
            top = self.caret.line;
        }
        if self.caret.line >= top + height {
            top = self.caret.line + 1 - height;
        }
        if top != self.scroll_top {
            self.scroll_top = top;
            self.workspace.scroll_to(self.editor, top, height);
        }
    }

    fn replace_selection(&mut self, range: TextRange, text: &str) {
        let start = self.document().offset_at(range.start);
        self.workspace.edit(self.editor, range, text);
        self.modified = true;

        let caret = self
            .document()
            .position_at(start + text.chars().count());
        self.anchor = None;
        self.caret = caret;
        self.workspace
            .set_selections(self.editor, vec![Selection::caret(caret)]);

        // The line count may have changed; republish the viewport.
        let height = self.viewport_height.max(1);
        self.workspace.scroll_to(self.editor, self.scroll_top, height);
        self.follow_caret();
    }

    fn insert_text(&mut self, text: &str) {
        let (start, end) = self.selection().min_max();
        self.replace_selection(TextRange::new(start, end), text);
    }

    fn backspace(&mut self) {
        let selection = self.selection();
        if !selection.is_empty() {
            let (start, end) = selection.min_max();
            self.replace_selection(TextRange::new(start, end), "");
            return;
        }
        if self.caret == Position::default() {
            return;
        }
        let start = self.left_of(self.caret);
        self.replace_selection(TextRange::new(start, self.caret), "");
    }

    fn cycle_render_whitespace(&mut self) {
        let Some(extension) = self.extension.as_ref() else {
            return;
        };
        let next = extension.resolver().global().render_whitespace.cycle();
        self.workspace
            .update_settings(|settings| settings.set(keys::RENDER_WHITESPACE, next.as_str()));
        self.status_message = format!("editor.renderWhitespace = {}", next.as_str());
        debug!(mode = next.as_str(), "cycled render mode");
    }

    fn toggle_line_ending(&mut self) {
        let next = match self.document().line_ending() {
            LineEnding::Lf => LineEnding::Crlf,
            LineEnding::Crlf => LineEnding::Lf,
        };
        self.workspace.set_line_ending(self.editor, next);
        self.modified = true;
        self.status_message = format!("Line ending: {}", next.label());
    }

    fn reload_settings(&mut self) {
        let Some(path) = self.settings_path.clone() else {
            self.status_message = "No settings file given".to_string();
            return;
        };
        match JsonSettings::load(&path) {
            Ok(settings) => {
                self.workspace.set_settings(settings);
                self.status_message = format!("Reloaded {}", path.display());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings reload failed");
                self.status_message = format!("Reload failed: {e}");
            }
        }
    }

    fn save_file(&mut self) -> io::Result<()> {
        fs::write(&self.file_path, self.document().text_for_saving())?;
        self.modified = false;
        Ok(())
    }

    /// Track the terminal's height and republish the visible range when it changes.
    fn set_viewport_height(&mut self, height: usize) {
        if height == 0 || height == self.viewport_height {
            return;
        }
        self.viewport_height = height;
        self.workspace.scroll_to(self.editor, self.scroll_top, height);
        self.follow_caret();
        self.dispatch_events();
    }

    fn quit(&mut self) {
        if let Some(extension) = self.extension.take() {
            let Ok(()) = extension.deactivate(&mut self.workspace);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.set_viewport_height(chunks[0].height.saturating_sub(2) as usize);

        self.render_editor(frame, chunks[0]);
        self.render_status_line(frame, chunks[1]);
        self.render_shortcuts(frame, chunks[2]);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let Some(editor) = self.workspace.editor(self.editor) else {
            return;
        };
        let doc = editor.document();
        let decorations = collect_decorations(editor.rendered());
        let selection = self.selection();

        let height = area.height.saturating_sub(2) as usize;
        let mut lines = Vec::with_capacity(height);
        for number in self.scroll_top..self.scroll_top + height {
            let Some(line) = doc.line_at(number) else {
                lines.push(Line::from(""));
                continue;
            };
            let selected = |column: usize| {
                !selection.is_empty() && {
                    let (start, end) = selection.min_max();
                    let pos = Position::new(number, column);
                    start <= pos && pos < end
                }
            };
            lines.push(render_line(&line.text, decorations.get(&number), selected));
        }

        let title = format!(
            " {}{} ",
            self.file_path.display(),
            if self.modified { " *" } else { "" }
        );
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if let Some(line) = doc.line_at(self.caret.line)
            && (self.scroll_top..self.scroll_top + height).contains(&self.caret.line)
        {
            let mut x = visual_x_for_column(&line.text, self.caret.column);
            // `Before` markers sit between the text and a caret at the line end.
            if self.caret.column >= line.text.chars().count()
                && let Some(line_decorations) = decorations.get(&self.caret.line)
            {
                x += line_decorations
                    .markers
                    .iter()
                    .filter(|(_, _, placement)| *placement == DecorationPlacement::Before)
                    .map(|(glyph, _, _)| glyph.chars().map(char_width).sum::<usize>())
                    .sum::<usize>();
            }
            let y = self.caret.line - self.scroll_top;
            let (cursor_x, cursor_y) = cursor_cell(area, x, y);
            frame.set_cursor_position(CursorPosition::new(cursor_x, cursor_y));
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let doc = self.document();
        let line_ending = doc.line_ending();
        let (mode, non_default) = match &self.extension {
            Some(extension) => {
                let settings = extension
                    .resolver()
                    .resolve(self.workspace.config(), doc.language_id());
                (
                    settings.render_whitespace.as_str(),
                    settings.is_non_default(line_ending),
                )
            }
            None => ("-", false),
        };

        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Ln {}, Col {} | {}{} | whitespace: {} | {}",
                self.caret.line + 1,
                self.caret.column + 1,
                line_ending.label(),
                if non_default { " (non-default)" } else { "" },
                mode,
                doc.language_id().unwrap_or("plaintext"),
            )
        };

        let status_line = Paragraph::new(status_text).style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "Ctrl-Q:quit  Ctrl-S:save  Ctrl-W:whitespace mode  Ctrl-E:line ending  Ctrl-R:reload settings  Shift+arrows:select";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

/// Send `tracing` output to the file named by `EOLMARK_LOG`; the terminal belongs to the UI.
fn setup_tracing() -> io::Result<()> {
    let Some(path) = env::var_os("EOLMARK_LOG").map(PathBuf::from) else {
        return Ok(());
    };
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("eolmark_core=debug,eolmark_config=debug,info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    info!(path = %path.display(), "eolmark-view tracing initialized");
    Ok(())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file_path> [settings.json]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} notes.md .vscode/settings.json", args[0]);
        process::exit(1);
    }

    setup_tracing()?;

    let file_path = PathBuf::from(&args[1]);
    let settings_path = args.get(2).map(PathBuf::from);
    let mut app = App::new(file_path, settings_path)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);
    app.quit();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => {
                    app.insert_text(&text);
                    app.dispatch_events();
                }
                // Resize: the next draw picks up the new height.
                _ => {}
            }
        }
    }

    Ok(())
}
