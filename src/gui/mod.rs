//! Terminal correction form: an input pane, a corrected pane and a stats line.

use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{error, info};

use crate::cli::display::stats_line;
use crate::clipboard;
use crate::error::Result;
use crate::pipeline::CorrectionPipeline;

type Copier = fn(&str) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Check,
    Copy,
    Quit,
}

pub struct App<'a> {
    pipeline: &'a CorrectionPipeline,
    copier: Copier,
    pub input: String,
    pub output: String,
    pub stats: String,
    pub status: String,
}

impl<'a> App<'a> {
    pub fn new(pipeline: &'a CorrectionPipeline) -> Self {
        Self::with_copier(pipeline, clipboard::copy_text)
    }

    pub fn with_copier(pipeline: &'a CorrectionPipeline, copier: Copier) -> Self {
        Self {
            pipeline,
            copier,
            input: String::new(),
            output: String::new(),
            stats: stats_line(0, 0),
            status: String::new(),
        }
    }

    /// Edit the input buffer or map the key to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::F(5) => Action::Check,
            KeyCode::Char('r') if ctrl => Action::Check,
            KeyCode::Char('y') if ctrl => Action::Copy,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char(_) if ctrl => Action::None,
            KeyCode::Char(c) => {
                self.input.push(c);
                Action::None
            }
            KeyCode::Enter => {
                self.input.push('\n');
                Action::None
            }
            KeyCode::Tab => {
                self.input.push('\t');
                Action::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Run spelling and grammar on the input and show the result.
    pub fn on_check(&mut self) {
        if self.input.trim().is_empty() {
            self.status = "Please enter some text.".to_string();
            return;
        }

        match self.pipeline.run(&self.input) {
            Ok(result) => {
                self.stats = stats_line(result.spelling.changed_words, result.grammar.issue_count());
                self.output = result.corrected;
                self.status.clear();
            }
            Err(e) => {
                error!("❌ Check failed: {}", e);
                self.status = format!("Error: {}", e);
            }
        }
    }

    pub fn on_copy(&mut self) {
        if self.output.is_empty() {
            self.status = "Nothing to copy.".to_string();
            return;
        }

        self.status = match (self.copier)(&self.output) {
            Ok(()) => "Corrected text copied to clipboard.".to_string(),
            Err(e) => format!("Error: {}", e),
        };
    }
}

/// Take over the terminal until the user quits.
pub fn run(pipeline: &CorrectionPipeline) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("🖥️ Terminal form started");
    let mut app = App::new(pipeline);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                Action::Quit => return Ok(()),
                Action::Check => {
                    app.status = "Checking...".to_string();
                    terminal.draw(|f| ui(f, app))?;
                    app.on_check();
                }
                Action::Copy => app.on_copy(),
                Action::None => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let input = Paragraph::new(app.input.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Input "));
    f.render_widget(input, chunks[0]);

    let output = Paragraph::new(app.output.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Corrected "));
    f.render_widget(output, chunks[1]);

    let stats = Paragraph::new(app.stats.as_str()).style(Style::default().fg(Color::Cyan).bold());
    f.render_widget(stats, chunks[2]);

    let status_style = if app.status.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    f.render_widget(Paragraph::new(app.status.as_str()).style(status_style), chunks[3]);

    let help = " F5/Ctrl+R:Check  Ctrl+Y:Copy corrected text  Esc:Quit";
    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[4]);
}
