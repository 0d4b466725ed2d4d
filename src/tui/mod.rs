pub mod widgets;

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, warn};

use crate::export::png::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::export::ExportFormat;
use crate::scheme::SchemeKind;
use crate::session::Session;
use crate::storage::KeyValueStore;

use widgets::{CombinationsWidget, PaletteWidget, SchemeWidget};

const HELP: &str = "space regenerate  u/r undo/redo  \u{2190}/\u{2192} select  l lock  c copy  \
                    s scheme  d dark  1/2/3 png/css/json  q quit";

/// State for the interactive TUI application.
pub struct TuiApp<S: KeyValueStore> {
    pub session: Session<S>,
    pub selected: usize,
    pub scheme_kind: SchemeKind,
    /// Where the export keys write their files.
    pub export_dir: PathBuf,
    pub status: String,
    pub should_quit: bool,
}

impl<S: KeyValueStore> TuiApp<S> {
    pub fn new(session: Session<S>, export_dir: PathBuf) -> Self {
        Self {
            session,
            selected: 0,
            scheme_kind: SchemeKind::Complementary,
            export_dir,
            status: String::from("Press space to generate a new palette"),
            should_quit: false,
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let slots = self.session.palette().len();
        match key.code {
            KeyCode::Char(' ') => {
                self.status = if self.session.regenerate() {
                    "New palette".to_string()
                } else {
                    "Every slot is locked".to_string()
                };
            }
            KeyCode::Char('u') => {
                self.status = match self.session.undo() {
                    Ok(_) => "Undo".to_string(),
                    Err(e) => capitalize(&e.to_string()),
                };
            }
            KeyCode::Char('r') => {
                self.status = match self.session.redo() {
                    Ok(_) => "Redo".to_string(),
                    Err(e) => capitalize(&e.to_string()),
                };
            }
            KeyCode::Left => self.selected = (self.selected + slots - 1) % slots,
            KeyCode::Right => self.selected = (self.selected + 1) % slots,
            KeyCode::Char('l') => {
                self.status = match self.session.toggle_lock(self.selected) {
                    Ok(true) => format!("Slot {} locked", self.selected),
                    Ok(false) => format!("Slot {} unlocked", self.selected),
                    Err(e) => capitalize(&e.to_string()),
                };
            }
            KeyCode::Char('c') => self.copy_selected(),
            KeyCode::Char('s') => {
                self.scheme_kind = self.scheme_kind.next();
                self.status = format!("Scheme: {}", self.scheme_kind);
            }
            KeyCode::Char('d') => {
                let on = self.session.toggle_dark_mode();
                self.status = format!("Dark mode {}", if on { "on" } else { "off" });
            }
            KeyCode::Char('1') => self.export(ExportFormat::Png),
            KeyCode::Char('2') => self.export(ExportFormat::Css),
            KeyCode::Char('3') => self.export(ExportFormat::Json),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn copy_selected(&mut self) {
        let event = match self.session.copy(self.selected) {
            Ok(event) => event,
            Err(e) => {
                self.status = capitalize(&e.to_string());
                return;
            }
        };
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(event.hex.clone())) {
            Ok(()) => self.status = format!("Copied {}", event.hex),
            Err(e) => {
                warn!(%e, "clipboard write failed");
                self.status = format!("Clipboard error: {e}");
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let exporter = format.exporter(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        self.status = match exporter.save_in(self.session.palette(), &self.export_dir) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => format!("Export failed: {e:#}"),
        };
    }

    pub fn draw(&self, frame: &mut Frame) {
        let palette = self.session.palette();
        let [palette_area, combos_area, scheme_area, status_area] = Layout::vertical([
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .areas(frame.area());

        if self.session.dark_mode() {
            frame.render_widget(
                Block::new().style(Style::default().bg(Color::Black).fg(Color::White)),
                frame.area(),
            );
        }

        frame.render_widget(PaletteWidget::new(palette, self.selected), palette_area);
        frame.render_widget(CombinationsWidget::new(palette), combos_area);
        if let Ok(scheme) = self.session.scheme(self.selected, self.scheme_kind) {
            frame.render_widget(SchemeWidget::new(&scheme), scheme_area);
        }

        let history = self.session.history();
        let status = Paragraph::new(vec![
            Line::from(format!(
                "  {}    [{}/{}]",
                self.status,
                history.cursor() + 1,
                history.len()
            )),
            Line::from(format!("  {HELP}")).style(Style::default().fg(Color::DarkGray)),
        ])
        .block(Block::bordered().title("paletto"));
        frame.render_widget(status, status_area);
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;
            if let Event::Key(key) = event::read()? {
                debug!(code = ?key.code, "key pressed");
                self.handle_key(key);
            }
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Launch the TUI application. The store is flushed on exit, also after an
/// error in the event loop.
pub fn run<S: KeyValueStore>(mut app: TuiApp<S>) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = app.event_loop(&mut terminal);
    ratatui::restore();
    let saved = app.session.save();
    result.and(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{locked_key, MemoryStore};
    use crossterm::event::KeyModifiers;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> TuiApp<MemoryStore> {
        let session = Session::load_with_rng(MemoryStore::new(), 5, StdRng::seed_from_u64(3));
        TuiApp::new(session, std::env::temp_dir().join("paletto-test-tui-unused"))
    }

    fn press(app: &mut TuiApp<MemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn space_regenerates_and_undo_restores() {
        let mut app = app();
        let first = app.session.palette().clone();
        press(&mut app, KeyCode::Char(' '));
        assert_ne!(*app.session.palette(), first);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(*app.session.palette(), first);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.status, "Nothing to undo");
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 4);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn lock_applies_to_selected_slot() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        assert!(app.session.palette().slot(1).unwrap().locked);
        assert_eq!(app.status, "Slot 1 locked");
        assert_eq!(
            app.session.store().get(&locked_key(1)).as_deref(),
            Some("true")
        );

        let locked = app.session.palette().slot(1).unwrap().color;
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.session.palette().slot(1).unwrap().color, locked);
    }

    #[test]
    fn scheme_key_cycles_kinds() {
        let mut app = app();
        for expected in [
            SchemeKind::Analogous,
            SchemeKind::Triadic,
            SchemeKind::Tetradic,
            SchemeKind::Monochromatic,
            SchemeKind::Complementary,
        ] {
            press(&mut app, KeyCode::Char('s'));
            assert_eq!(app.scheme_kind, expected);
        }
    }

    #[test]
    fn dark_mode_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        assert!(app.session.dark_mode());
        assert_eq!(app.status, "Dark mode on");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert!(!app.should_quit);
    }

    #[test]
    fn export_keys_write_files() {
        let dir = std::env::temp_dir().join(format!("paletto-test-tui-{}", std::process::id()));
        let mut app = app();
        app.export_dir = dir.clone();

        press(&mut app, KeyCode::Char('2'));
        assert!(dir.join("palette.css").exists());
        assert!(app.status.starts_with("Saved"));
        press(&mut app, KeyCode::Char('3'));
        assert!(dir.join("palette.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn draw_shows_palette_and_history_position() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains(&app.session.palette().slot(0).unwrap().hex()));
        assert!(text.contains("[2/2]"));
        assert!(text.contains("Scheme: complementary"));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("nothing to redo"), "Nothing to redo");
        assert_eq!(capitalize(""), "");
    }
}
