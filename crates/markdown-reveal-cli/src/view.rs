//! Interactive live-preview editor.
//!
//! Every block is drawn collapsed except the one under the cursor. Edits go
//! through [`IncrementalEngine`]; large documents refresh after a short
//! pause in typing, and the event loop wakes at the engine's deadline.

use std::io::Stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use markdown_reveal_engine::{EngineOptions, Extensions, IncrementalEngine, StyleConfig};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::terminal;

const IDLE_TICK: Duration = Duration::from_millis(500);

pub struct App {
    path: PathBuf,
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
    engine: IncrementalEngine,
    modified: bool,
    scroll: u16,
    status: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

impl App {
    pub fn new(
        path: PathBuf,
        text: String,
        options: EngineOptions,
        extensions: Extensions,
        styles: StyleConfig,
    ) -> Self {
        let mut engine = IncrementalEngine::new(options, extensions, styles);
        engine.update(&text, Some(0));
        Self {
            status: format!("{} blocks", engine.document().blocks().len()),
            path,
            text,
            cursor: 0,
            engine,
            modified: false,
            scroll: 0,
        }
    }

    /// The cursor as the engine counts it, in characters.
    fn char_cursor(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    fn edited(&mut self) {
        self.modified = true;
        match self.engine.update(&self.text, Some(self.char_cursor())) {
            Some(stats) => {
                self.status = format!(
                    "{} blocks, {} re-rendered ({} cached)",
                    stats.blocks, stats.rerendered, stats.cache_hits
                )
            }
            None => self.status = "refresh pending".to_string(),
        }
    }

    fn moved(&mut self) {
        self.engine.set_cursor(Some(self.char_cursor()));
    }

    fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.edited();
    }

    fn backspace(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.text.remove(self.cursor);
            self.edited();
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
            self.edited();
        }
    }

    fn left(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.moved();
        }
    }

    fn right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
            self.moved();
        }
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i)
    }

    /// Byte offset of char `column` on the line starting at `start`, clamped
    /// to the line end.
    fn offset_in_line(&self, start: usize, column: usize) -> usize {
        let end = self.line_end(start);
        self.text[start..end]
            .char_indices()
            .nth(column)
            .map_or(end, |(i, _)| start + i)
    }

    fn column(&self) -> usize {
        self.text[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count()
    }

    fn up(&mut self) {
        let start = self.line_start(self.cursor);
        if start > 0 {
            let column = self.column();
            self.cursor = self.offset_in_line(self.line_start(start - 1), column);
            self.moved();
        }
    }

    fn down(&mut self) {
        let end = self.line_end(self.cursor);
        if end < self.text.len() {
            let column = self.column();
            self.cursor = self.offset_in_line(end + 1, column);
            self.moved();
        }
    }

    fn home(&mut self) {
        self.cursor = self.line_start(self.cursor);
        self.moved();
    }

    fn end(&mut self) {
        self.cursor = self.line_end(self.cursor);
        self.moved();
    }

    fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, &self.text)?;
        self.modified = false;
        self.status = format!("saved {}", self.path.display());
        info!("saved {} ({} bytes)", self.path.display(), self.text.len());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Char('q') if ctrl => return Ok(Action::Quit),
            KeyCode::Char('s') if ctrl => {
                if let Err(e) = self.save() {
                    warn!("save failed: {e}");
                    self.status = format!("save failed: {e}");
                }
            }
            KeyCode::Char(ch) if !ctrl => self.insert(ch),
            KeyCode::Enter => self.insert('\n'),
            KeyCode::Tab => self.insert('\t'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Up => self.up(),
            KeyCode::Down => self.down(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => {}
        }
        Ok(Action::Continue)
    }

    /// Wake up for the next key press or the pending refresh, whichever
    /// comes first.
    fn wait_timeout(&self) -> Duration {
        self.engine
            .deadline()
            .map_or(IDLE_TICK, |d| d.saturating_duration_since(Instant::now()))
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(app.wait_timeout())?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)? == Action::Quit
        {
            app.engine.dispose();
            return Ok(());
        }

        if let Some(stats) = app.engine.poll() {
            app.status = format!("{} blocks, {} re-rendered", stats.blocks, stats.rerendered);
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let screen = terminal::layout(&app.engine.output(), Some(app.cursor));

    // Keep the cursor row inside the viewport
    let height = chunks[0].height.saturating_sub(2);
    if let Some((_, row)) = screen.cursor {
        if row < app.scroll {
            app.scroll = row;
        } else if height > 0 && row >= app.scroll + height {
            app.scroll = row + 1 - height;
        }
    }

    let title = format!(
        "{}{}",
        app.path.display(),
        if app.modified { " [modified]" } else { "" }
    );
    let content = Paragraph::new(screen.lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.scroll, 0));
    f.render_widget(content, chunks[0]);

    if let Some((column, row)) = screen.cursor {
        let inner = chunks[0];
        f.set_cursor_position(Position::new(
            inner.x + 1 + column,
            inner.y + 1 + row - app.scroll,
        ));
    }

    let help_text = Line::from(vec![
        Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw(" Esc/Ctrl-Q: Quit | Ctrl-S: Save | Arrows: Move"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), chunks[1]);
}
