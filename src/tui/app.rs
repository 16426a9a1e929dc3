//! Demo host application
//!
//! Shows one [`GifView`] full screen with a small bordered caption on top.
//! The loop sleeps on a single event channel: the redraw driver sends
//! repaint requests into it and an input thread forwards terminal events.

use std::io::{self, Stdout};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::gif_view::GifView;
use super::redraw::RedrawDriver;
use super::theme::Theme;
use crate::config::GifViewConfig;
use crate::Result;

/// How long the input thread waits for a terminal event before checking
/// whether the app has gone away.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Caption box size, matching the classic "Hello, World" modal.
const CAPTION_WIDTH: u16 = 24;
const CAPTION_HEIGHT: u16 = 3;

/// Events the host loop reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Time may have moved the animation on; redraw.
    Repaint,
    /// The terminal was resized.
    Resize,
    Key(KeyEvent),
    Quit,
}

/// Application state
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    view: GifView,
    config: GifViewConfig,
    caption: String,
    should_quit: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Take over the terminal and prepare to show `view`.
    pub fn new(view: GifView, config: GifViewConfig) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            view,
            config,
            caption: "Hello, World".to_string(),
            should_quit: false,
            events_tx,
            events_rx,
        })
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sender for injecting events, e.g. [`AppEvent::Quit`] from another task.
    pub fn events(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.events_tx.clone()
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let repaint_tx = self.events_tx.clone();
        let driver = RedrawDriver::spawn(
            move || {
                let _ = repaint_tx.send(AppEvent::Repaint);
            },
            self.config.tick_interval,
        )?;
        spawn_input_reader(self.events_tx.clone());

        let result = self.event_loop().await;
        driver.shutdown().await;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.draw()?;

        while !self.should_quit {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            let mut repaint = self.handle_event(event);

            // Coalesce anything that piled up while we were drawing
            while let Ok(event) = self.events_rx.try_recv() {
                repaint |= self.handle_event(event);
            }

            if repaint && !self.should_quit {
                self.draw()?;
            }
        }

        Ok(())
    }

    /// Apply one event; returns whether the screen needs a repaint.
    fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Repaint | AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if is_quit_key(&key) {
                    self.should_quit = true;
                }
                false
            }
            AppEvent::Quit => {
                self.should_quit = true;
                false
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, &self.view, &self.caption))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn render(frame: &mut Frame, view: &GifView, caption: &str) {
    let area = frame.area();
    frame.render_widget(view, area);

    let modal = centered_rect(area, CAPTION_WIDTH, CAPTION_HEIGHT);
    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(caption)
            .style(Theme::text())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border())
                    .title_bottom(Line::styled(" Esc ", Theme::key_desc())),
            ),
        modal,
    );
}

/// A `width` x `height` rect centred in `area`, shrunk to fit if needed.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Forward terminal events into the app's channel until the app goes away.
fn spawn_input_reader(tx: mpsc::UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Error polling terminal input: {}", e);
                    let _ = tx.send(AppEvent::Quit);
                    break;
                }
            }
            let sent = match event::read() {
                Ok(Event::Key(key)) => tx.send(AppEvent::Key(key)),
                Ok(Event::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!("Error reading terminal input: {}", e);
                    let _ = tx.send(AppEvent::Quit);
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        }
        debug!("Input reader stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_centered_rect() {
        assert_eq!(
            centered_rect(Rect::new(0, 0, 80, 24), 24, 3),
            Rect::new(28, 10, 24, 3)
        );
        assert_eq!(centered_rect(Rect::new(0, 0, 10, 2), 24, 3), Rect::new(0, 0, 10, 2));
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_render_shows_caption_over_gif() {
        let view = GifView::new();
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal
            .draw(|frame| render(frame, &view, "Hello, World"))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..30u16).map(|x| buffer[(x, 2)].symbol()).collect();
        assert!(row.contains("Hello, World"), "row was {row:?}");
    }
}
