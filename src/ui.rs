//! TUI module using ratatui.
//!
//! Component-based pattern: header, form, summary and footer are drawn from a
//! [`PageShell`] every frame. Requests run on the tokio runtime and report back
//! over a channel, so the screen keeps redrawing while one is in flight.

use crate::client::{ClientError, SummaryClient};
use crate::config::Config;
use crate::display::HEADING;
use crate::form::SummaryForm;
use crate::shell::{current_year, PageShell};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

/// Redraw interval while idle
const TICK: Duration = Duration::from_millis(100);

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const URL_PLACEHOLDER: &str = "https://example.com";
const TEXT_PLACEHOLDER: &str = "Enter your text here...";

/// Rows of text visible in the text input
const TEXT_ROWS: u16 = 5;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to create client: {0}")]
    Client(#[from] ClientError),
}

/// Focusable form controls, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Url,
    Text,
    Length,
    Style,
    Submit,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Url,
        Field::Text,
        Field::Length,
        Field::Style,
        Field::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

pub struct App {
    shell: PageShell,
    client: SummaryClient,
    runtime: Handle,
    results_tx: UnboundedSender<Result<String, ClientError>>,
    results_rx: UnboundedReceiver<Result<String, ClientError>>,
    /// Terminal lines for the current summary
    rendered: Option<Vec<Line<'static>>>,
    focus: Field,
    scroll: u16,
    tick: usize,
    year: i32,
    quit: bool,
}

impl App {
    pub fn new(shell: PageShell, client: SummaryClient, runtime: Handle) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let rendered = shell.display().map(|display| display.lines());
        Self {
            shell,
            client,
            runtime,
            results_tx,
            results_rx,
            rendered,
            focus: Field::Url,
            scroll: 0,
            tick: 0,
            year: current_year(),
            quit: false,
        }
    }

    fn is_enabled(&self, field: Field) -> bool {
        match field {
            Field::Url => self.shell.form.url_enabled(),
            Field::Text => self.shell.form.text_enabled(),
            _ => true,
        }
    }

    /// Move focus to the next or previous control, skipping disabled inputs
    fn move_focus(&mut self, forward: bool) {
        let len = Field::ORDER.len();
        let mut index = self.focus.index();
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if self.is_enabled(Field::ORDER[index]) {
                self.focus = Field::ORDER[index];
                return;
            }
        }
    }

    fn submit(&mut self) {
        let Some(request) = self.shell.form.begin_submit() else {
            return;
        };
        info!(url = %self.client.url(), "submitting summary request");

        let client = self.client.clone();
        let tx = self.results_tx.clone();
        self.runtime.spawn(async move {
            let result = client.summarize(&request).await;
            // The receiver is gone only once the UI has exited
            let _ = tx.send(result);
        });
    }

    /// Apply any finished requests
    fn drain_results(&mut self) {
        while let Ok(result) = self.results_rx.try_recv() {
            let success = result.is_ok();
            self.shell.apply(result);
            if success {
                self.rendered = self.shell.display().map(|display| display.lines());
                self.scroll = 0;
            }
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let form = &mut self.shell.form;
        match self.focus {
            Field::Url => {
                let mut value = form.url().to_string();
                edit(&mut value);
                form.set_url(value);
            }
            Field::Text => {
                let mut value = form.text().to_string();
                edit(&mut value);
                form.set_text(value);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            code => self.handle_field_key(code, key.modifiers),
        }
    }

    fn handle_field_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let plain = !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match (self.focus, code) {
            (Field::Url | Field::Text, KeyCode::Char(c)) if plain => {
                self.edit_focused(|value| value.push(c))
            }
            (Field::Url | Field::Text, KeyCode::Backspace) => self.edit_focused(|value| {
                value.pop();
            }),
            (Field::Text, KeyCode::Enter) => self.edit_focused(|value| value.push('\n')),
            (Field::Url | Field::Submit, KeyCode::Enter) | (Field::Submit, KeyCode::Char(' ')) => {
                self.submit()
            }
            (Field::Length, KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ')) => {
                self.shell.form.cycle_length()
            }
            (Field::Style, KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ')) => {
                self.shell.form.cycle_style()
            }
            (_, KeyCode::Down) => self.move_focus(true),
            (_, KeyCode::Up) => self.move_focus(false),
            _ => {}
        }
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<(), UiError> {
        while !self.quit {
            self.drain_results();
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [header, form, summary, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(TEXT_ROWS + 12),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_header(frame, header);
        self.draw_form(frame, form);
        self.draw_summary(frame, summary);
        self.draw_footer(frame, footer);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.shell.header_text()),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(header, area);
    }

    fn input_block(&self, title: &str, field: Field) -> Block<'static> {
        let enabled = self.is_enabled(field);
        let color = if !enabled {
            Color::DarkGray
        } else if self.focus == field {
            Color::Yellow
        } else {
            Color::White
        };
        let title = if enabled {
            title.to_string()
        } else {
            format!("{} (disabled)", title)
        };
        Block::bordered()
            .title(title)
            .border_style(Style::default().fg(color))
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let [url_area, text_area, select_area, error_area, submit_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(TEXT_ROWS + 2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .areas(area);
        let [length_area, style_area] =
            Layout::horizontal([Constraint::Percentage(50); 2]).areas(select_area);

        let form = &self.shell.form;
        let placeholder = Style::default().fg(Color::DarkGray);

        // URL input, scrolled so the end stays visible
        let url = form.url();
        let (url_offset, url_cursor) =
            tail_window(url.chars().count(), url_area.width.saturating_sub(2));
        let url_line = if url.is_empty() {
            Line::from(Span::styled(URL_PLACEHOLDER, placeholder))
        } else {
            Line::from(url.chars().skip(url_offset).collect::<String>())
        };
        frame.render_widget(
            Paragraph::new(url_line).block(self.input_block("Website URL", Field::Url)),
            url_area,
        );

        // Text input, scrolled so the last row and its end stay visible
        let text = form.text();
        let rows: Vec<&str> = text.split('\n').collect();
        let (row_offset, row_cursor) = tail_window(rows.len() - 1, TEXT_ROWS);
        let last_width = rows.last().map_or(0, |row| row.chars().count());
        let (column_offset, column_cursor) =
            tail_window(last_width, text_area.width.saturating_sub(2));
        let text_lines: Vec<Line> = if text.is_empty() {
            vec![Line::from(Span::styled(TEXT_PLACEHOLDER, placeholder))]
        } else {
            rows[row_offset..]
                .iter()
                .map(|row| Line::from(row.chars().skip(column_offset).collect::<String>()))
                .collect()
        };
        frame.render_widget(
            Paragraph::new(text_lines).block(self.input_block("Or Enter Text", Field::Text)),
            text_area,
        );

        let selector = |label: &str| {
            Line::from(vec![
                Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
                Span::raw(label.to_string()),
                Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(
            Paragraph::new(selector(form.length().label()))
                .block(self.input_block("Summary Length", Field::Length)),
            length_area,
        );
        frame.render_widget(
            Paragraph::new(selector(form.style().label()))
                .block(self.input_block("Summary Style", Field::Style)),
            style_area,
        );

        if let Some(error) = form.error() {
            frame.render_widget(
                Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
                error_area,
            );
        }

        let button = if form.is_loading() {
            Paragraph::new(format!("{} Summarizing...", SPINNER[self.tick % SPINNER.len()]))
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new("Summarize").style(Style::default().add_modifier(Modifier::BOLD))
        };
        frame.render_widget(
            button.centered().block(self.input_block("", Field::Submit)),
            submit_area,
        );

        match self.focus {
            Field::Url => {
                frame.set_cursor_position((url_area.x + 1 + url_cursor, url_area.y + 1));
            }
            Field::Text => {
                frame.set_cursor_position((
                    text_area.x + 1 + column_cursor,
                    text_area.y + 1 + row_cursor,
                ));
            }
            _ => {}
        }
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect) {
        // Nothing at all, not even the border, until there is a summary
        let Some(lines) = &self.rendered else {
            return;
        };
        let summary = Paragraph::new(lines.clone())
            .block(
                Block::bordered()
                    .title(Span::styled(
                        HEADING,
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                    .border_style(Style::default().fg(Color::Gray)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(summary, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let hint = Style::default().fg(Color::Gray);
        let footer = Paragraph::new(Line::from(vec![
            Span::raw(format!(" {}", self.shell.footer_text(self.year))),
            Span::styled(" • ", Style::default().fg(Color::Blue)),
            Span::styled("Tab", key),
            Span::styled(":next ", hint),
            Span::styled("Ctrl+S", key),
            Span::styled(":summarize ", hint),
            Span::styled("PgUp/PgDn", key),
            Span::styled(":scroll ", hint),
            Span::styled("Esc", key),
            Span::styled(":quit", hint),
        ]))
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
        frame.render_widget(footer, area);
    }
}

/// Scroll offset that keeps position `end` inside a window `visible` cells
/// wide, and where `end` lands in that window
fn tail_window(end: usize, visible: u16) -> (usize, u16) {
    let last = usize::from(visible.max(1)) - 1;
    let offset = end.saturating_sub(last);
    let cursor = u16::try_from(end - offset).unwrap_or(u16::MAX);
    (offset, cursor)
}

/// Run the TUI until the user quits
pub async fn run(config: &Config) -> Result<(), UiError> {
    let client = SummaryClient::new(&config.endpoint)?;
    let shell = PageShell::new(SummaryForm::from_defaults(&config.defaults));
    let mut app = App::new(shell, client, Handle::current());

    info!(endpoint = %config.endpoint.summarize_url(), "starting tui");
    let mut terminal = ratatui::init();
    let result = tokio::task::block_in_place(|| app.run_loop(&mut terminal));
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn test_app() -> App {
        let endpoint = EndpointConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = SummaryClient::new(&endpoint).unwrap();
        App::new(PageShell::default(), client, Handle::current())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn typing_in_url_disables_text_field() {
        let mut app = test_app();
        type_str(&mut app, "https://a.b");
        assert_eq!(app.shell.form.url(), "https://a.b");

        // Tab skips the disabled text input
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Field::Length);

        app.focus = Field::Text;
        type_str(&mut app, "ignored");
        assert_eq!(app.shell.form.text(), "");
        assert!(screen(&app).contains("Or Enter Text (disabled)"));
    }

    #[test]
    fn tail_window_keeps_end_visible() {
        assert_eq!(tail_window(3, 10), (0, 3));
        assert_eq!(tail_window(9, 10), (0, 9));
        assert_eq!(tail_window(25, 10), (16, 9));
        assert_eq!(tail_window(100_000, 5), (99_996, 4));
        assert_eq!(tail_window(4, 0), (4, 0));
    }

    #[tokio::test]
    async fn very_long_text_draws_its_last_rows() {
        let mut app = test_app();
        app.focus = Field::Text;
        let mut text = "x\n".repeat(70_000);
        text.push_str("final row");
        app.shell.form.set_text(text);

        let text = screen(&app);
        assert!(text.contains("final row"));
    }

    #[tokio::test]
    async fn wide_text_row_scrolls_to_its_end() {
        let mut app = test_app();
        app.focus = Field::Text;
        let mut row = "a".repeat(200);
        row.push_str("TAIL");
        app.shell.form.set_text(row);

        let text = screen(&app);
        assert!(text.contains("aTAIL"));
    }

    #[tokio::test]
    async fn long_url_scrolls_to_its_end() {
        let mut app = test_app();
        let url = format!("https://example.com/{}end", "p".repeat(150));
        app.shell.form.set_url(url);

        assert!(screen(&app).contains("pend"));
    }

    #[tokio::test]
    async fn empty_submit_shows_validation_message() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);

        assert!(!app.shell.form.is_loading());
        assert_eq!(
            app.shell.form.error(),
            Some("Please provide either a URL or some text.")
        );
        assert!(screen(&app).contains("Please provide either a URL or some text."));
    }

    #[tokio::test]
    async fn selectors_cycle_on_keypress() {
        let mut app = test_app();
        app.focus = Field::Length;
        press(&mut app, KeyCode::Right);
        app.focus = Field::Style;
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.shell.form.length().label(), "Short");
        assert_eq!(app.shell.form.style().label(), "Bullet Points");
    }

    #[tokio::test]
    async fn summary_card_appears_only_after_success() {
        let mut app = test_app();
        assert!(!screen(&app).contains(HEADING));

        type_str(&mut app, "https://a.b");
        app.shell.form.begin_submit().unwrap();
        app.results_tx.send(Ok("# Hello there".to_string())).unwrap();
        app.drain_results();

        let text = screen(&app);
        assert!(text.contains(HEADING));
        assert!(text.contains("Hello there"));
        assert!(!app.shell.form.is_loading());
    }

    #[tokio::test]
    async fn failure_leaves_summary_in_place() {
        let mut app = test_app();
        app.shell.set_summary("kept".to_string());
        app.rendered = app.shell.display().map(|d| d.lines());

        type_str(&mut app, "https://a.b");
        app.shell.form.begin_submit().unwrap();
        app.results_tx
            .send(Err(ClientError::Decode("eof".to_string())))
            .unwrap();
        app.drain_results();

        let text = screen(&app);
        assert!(text.contains("kept"));
        assert!(text.contains("An unexpected error occurred."));
    }
}
