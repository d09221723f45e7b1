//! Main application state and rendering

use crate::data::Catalog;
use crate::game::{Dispatch, Dispatcher, PendingCommand, Session, TranscriptEntry, MAX_DETECTION};
use crate::tui::widgets::{BusyIndicator, StatusBar};
use crate::tui::{centered_rect, create_content_layout, create_main_layout, styled_block, Theme};
use crate::tui::{HELP_TEXT, SMALL_LOGO};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, warn};

/// How a spawned command ended: its dispatch, or why the task died
type Completion = Result<Option<Dispatch>, String>;

/// Application state
pub struct App {
    pub session: Session,
    pub dispatcher: Dispatcher,
    pub theme: Theme,
    pub running: bool,
    pub show_help: bool,
    pub input_buffer: String,
    pub scroll: u16,                 // Lines scrolled up from the bottom
    pub live: Vec<TranscriptEntry>,  // Progress of the command in flight
    tick: usize,
    live_tx: UnboundedSender<TranscriptEntry>,
    live_rx: UnboundedReceiver<TranscriptEntry>,
    done_tx: UnboundedSender<Completion>,
    done_rx: UnboundedReceiver<Completion>,
}

impl App {
    pub fn new(session: Session, dispatcher: Dispatcher) -> Self {
        let (live_tx, live_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        Self {
            session,
            dispatcher,
            theme: Theme::default(),
            running: true,
            show_help: false,
            input_buffer: String::new(),
            scroll: 0,
            live: Vec::new(),
            tick: 0,
            live_tx,
            live_rx,
            done_tx,
            done_rx,
        }
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self) -> std::io::Result<bool> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(self.running)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match key.code {
            KeyCode::Enter => self.execute_command(),
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.input_buffer.clear();
                }
            }
            KeyCode::Up => {
                if let Some(line) = self.session.history.previous() {
                    self.input_buffer = line.to_string();
                }
            }
            KeyCode::Down => match self.session.history.next() {
                Some(line) => self.input_buffer = line.to_string(),
                None => self.input_buffer.clear(),
            },
            KeyCode::PageUp => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char('?') if self.input_buffer.is_empty() => {
                self.show_help = !self.show_help;
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    /// Submit the typed line
    fn execute_command(&mut self) {
        let keyword = self.input_buffer.trim().to_lowercase();
        if keyword == "exit" || keyword == "quit" {
            self.running = false;
            return;
        }

        match self.session.begin(&self.input_buffer) {
            Ok(Some(pending)) => {
                self.input_buffer.clear();
                self.scroll = 0;
                self.spawn(pending);
            }
            Ok(None) => self.input_buffer.clear(),
            // Keep what was typed; it can be sent once the current command ends
            Err(err) => warn!(error = %err, "Input rejected"),
        }
    }

    /// Run the command off the UI thread
    fn spawn(&self, pending: PendingCommand) {
        let dispatcher = self.dispatcher.clone();
        let live = self.live_tx.clone();
        let done = self.done_tx.clone();

        let handle = tokio::spawn(async move {
            dispatcher
                .dispatch(&pending.snapshot, &pending.line, Some(live))
                .await
        });
        tokio::spawn(async move {
            let outcome = handle.await.map_err(|err| err.to_string());
            let _ = done.send(outcome);
        });
    }

    /// Pull in progress lines and finished commands
    pub fn update(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        while let Ok(outcome) = self.done_rx.try_recv() {
            // Everything the finished command streamed is already in its dispatch
            while self.live_rx.try_recv().is_ok() {}
            self.live.clear();
            match outcome {
                Ok(dispatch) => {
                    self.session.complete(dispatch);
                }
                Err(reason) => {
                    error!(reason = %reason, "Command task failed");
                    self.session.abort(&reason);
                }
            }
        }
        while let Ok(entry) = self.live_rx.try_recv() {
            self.live.push(entry);
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let layout = create_main_layout(frame.area());

        self.render_header(frame, layout[0]);

        let content = create_content_layout(layout[1]);
        self.render_transcript(frame, content[0]);
        self.render_side_panel(frame, content[1]);

        self.render_prompt(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(21), Constraint::Min(20)])
            .split(area);

        let logo = Paragraph::new(SMALL_LOGO)
            .style(Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(logo, header_layout[0]);

        let state = &self.session.state;
        let connection = match &state.current_target {
            Some(ip) => match self.dispatcher.catalog().find_target(ip) {
                Some(target) => format!("Connected: {}", target.label()),
                None => format!("Connected: {}", ip),
            },
            None => "Not connected".to_string(),
        };
        let elapsed = Utc::now().signed_duration_since(self.session.started_at);
        let banner = Paragraph::new(format!(
            " {} | Level {} | ${} | {:02}:{:02}:{:02} ",
            connection,
            state.level,
            state.money,
            elapsed.num_hours(),
            elapsed.num_minutes() % 60,
            elapsed.num_seconds() % 60
        ))
        .style(Style::default().fg(self.theme.warning))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.border)));
        frame.render_widget(banner, header_layout[1]);
    }

    fn render_transcript(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .session
            .transcript
            .entries()
            .iter()
            .chain(self.live.iter())
            .flat_map(|entry| {
                let style = self.theme.category_style(entry.category);
                let symbol = entry.category.symbol();
                entry
                    .text
                    .lines()
                    .enumerate()
                    .map(move |(i, text)| {
                        let marker = if i == 0 { symbol } else { " " };
                        Line::from(Span::styled(format!("{} {}", marker, text), style))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        // Follow the tail unless the player scrolled up
        let visible = area.height.saturating_sub(2) as usize;
        let bottom = lines.len().saturating_sub(visible);
        let top = bottom.saturating_sub(self.scroll as usize) as u16;

        let terminal = Paragraph::new(lines)
            .block(styled_block("Terminal", &self.theme))
            .scroll((top, 0));
        frame.render_widget(terminal, area);
    }

    fn render_side_panel(&self, frame: &mut Frame, area: Rect) {
        let block = styled_block("Operator", &self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),  // XP
                Constraint::Length(1),
                Constraint::Length(2),  // Detection
                Constraint::Length(1),
                Constraint::Min(3),     // Details
            ])
            .split(inner);

        let state = &self.session.state;
        let rules = self.session.rules();
        frame.render_widget(
            StatusBar::new("XP", state.level_progress(rules), 100).color(self.theme.accent),
            chunks[0],
        );
        frame.render_widget(
            StatusBar::new("Detection", state.detection_level.min(MAX_DETECTION) as u8, MAX_DETECTION as u8)
                .warning_threshold(50)
                .danger_threshold(75),
            chunks[2],
        );

        let mut details = vec![
            Line::from(vec![
                Span::raw("Stealth: "),
                if state.stealth_mode {
                    Span::styled("ON", Style::default().fg(self.theme.success))
                } else {
                    Span::styled("OFF", Style::default().fg(self.theme.border))
                },
            ]),
            Line::from(format!(
                "XP: {}/{}",
                state.experience,
                state.experience_threshold(rules)
            )),
            Line::from(""),
            Line::from(Span::styled("Programs", Style::default().add_modifier(Modifier::BOLD))),
        ];
        details.extend(
            state
                .inventory
                .iter()
                .map(|(name, installed)| Line::from(format!("  {} (t{})", name, installed.tier))),
        );
        if !state.discovered_vulnerabilities.is_empty() {
            details.push(Line::from(""));
            details.push(Line::from(Span::styled("Findings", Style::default().add_modifier(Modifier::BOLD))));
            details.extend(
                state
                    .discovered_vulnerabilities
                    .iter()
                    .map(|vuln| Line::from(Span::styled(format!("  {}", vuln), Style::default().fg(self.theme.warning)))),
            );
        }
        frame.render_widget(Paragraph::new(details).wrap(Wrap { trim: true }), chunks[4]);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let busy = self.session.is_busy();
        let border = if busy { self.theme.warning } else { self.theme.prompt };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Command ");
        let inner = block.inner(area);

        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", self.dispatcher.prompt()), Style::default().fg(self.theme.prompt)),
            Span::styled(format!("{}_", self.input_buffer), Style::default().fg(self.theme.fg)),
        ]))
        .block(block);
        frame.render_widget(prompt, area);

        if busy && inner.width > 14 {
            let spinner_area = Rect::new(inner.x + inner.width - 13, inner.y, 13, 1);
            frame.render_widget(BusyIndicator::new(self.tick, "working..."), spinner_area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = format!(
            " backend: {} | session {} | ? for keys, 'help' for commands ",
            self.dispatcher.backend_name(),
            self.session.id,
        );
        let status = Paragraph::new(status_text)
            .style(Style::default().fg(self.theme.fg).bg(self.theme.border));
        frame.render_widget(status, area);
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let popup_area = centered_rect(frame.area(), 51, 16);
        frame.render_widget(Clear, popup_area);

        let help = Paragraph::new(HELP_TEXT)
            .style(Style::default().fg(self.theme.fg))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(self.theme.accent)));
        frame.render_widget(help, popup_area);
    }
}

/// Build the app for a catalog and dispatcher that share one config
pub fn build_app(catalog: &Catalog, dispatcher: Dispatcher, max_entries: usize) -> App {
    let rules = dispatcher.rules().clone();
    let state = crate::game::GameState::new(&rules, catalog);
    App::new(Session::new(state, rules, max_entries), dispatcher)
}
