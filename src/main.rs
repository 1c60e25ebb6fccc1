use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use golfpool_terminal::feed::{self, FeedSource};
use golfpool_terminal::picks::SheetSchema;
use golfpool_terminal::pool_params::PoolParams;
use golfpool_terminal::score::ParticipantResult;
use golfpool_terminal::state::{AppState, Delta, ProviderCommand, Screen, SortMode, apply_delta};
use golfpool_terminal::{export, mock_feed, picks};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(state: AppState, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => match self.state.screen {
                Screen::Standings => self.state.select_next(),
                Screen::Field => self.state.field_scroll = self.state.field_scroll.saturating_add(1),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.screen {
                Screen::Standings => self.state.select_prev(),
                Screen::Field => self.state.field_scroll = self.state.field_scroll.saturating_sub(1),
            },
            KeyCode::Char('s') => self.state.cycle_sort(),
            KeyCode::Char('f') | KeyCode::Tab => self.state.toggle_screen(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Standings,
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('x') => self.export_xlsx(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        if self.cmd_tx.send(ProviderCommand::RefreshField).is_err() {
            self.state.push_log("[WARN] Field refresh request failed");
        } else {
            self.state.push_log("[INFO] Field refresh requested");
        }
    }

    fn export_csv(&mut self) {
        let path = results_csv_path();
        match export::write_results_csv(&path, &self.state.results) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Standings written to {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] CSV export failed: {err}")),
        }
    }

    fn export_xlsx(&mut self) {
        let path = results_xlsx_path();
        match export::export_results_xlsx(&path, &self.state.results, &self.state.leaderboard) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Workbook written to {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] XLSX export failed: {err}")),
        }
    }
}

fn picks_path() -> PathBuf {
    env::args()
        .nth(1)
        .or_else(|| env::var("PICKS_FILE").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("picks.csv"))
}

fn results_csv_path() -> PathBuf {
    env::var("RESULTS_CSV")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pool_results.csv"))
}

fn results_xlsx_path() -> PathBuf {
    env::var("RESULTS_XLSX")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pool_results.xlsx"))
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let params = PoolParams::from_env();
    let schema = SheetSchema::from_env();
    let path = picks_path();
    let rows = picks::read_picks_csv(&path, &schema)
        .with_context(|| format!("reading pick sheet {}", path.display()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    match FeedSource::from_env() {
        FeedSource::Mock => mock_feed::spawn_mock_provider(tx, cmd_rx),
        _ => feed::spawn_provider(tx, cmd_rx),
    }

    let mut state = AppState::new(params, rows);
    state.push_log(format!("[INFO] Loaded picks from {}", path.display()));
    let mut app = App::new(state, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Standings => render_standings(frame, chunks[1], &app.state),
        Screen::Field => render_field(frame, chunks[1], &app.state),
    }

    render_logs(frame, chunks[2], &app.state);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = env::var("POOL_TITLE").unwrap_or_else(|_| "GOLF POOL".to_string());
    let refreshed = state
        .last_refresh
        .map(format_refresh_time)
        .unwrap_or_else(|| "waiting for field".to_string());
    let screen = match state.screen {
        Screen::Standings => "Standings",
        Screen::Field => "Field",
    };
    let sort = match state.sort {
        SortMode::Placement => "placement",
        SortMode::Name => "name",
    };
    format!("{title} | {screen} | Sort: {sort} | {refreshed}")
}

fn format_refresh_time(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    format!("updated {}", local.format("%H:%M:%S"))
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Standings => {
            "j/k Move | s Sort | f Field | r Refresh | e CSV | x XLSX | ? Help | q Quit".to_string()
        }
        Screen::Field => "j/k Scroll | b/Esc Standings | r Refresh | ? Help | q Quit".to_string(),
    }
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(err) = state.score_error.as_ref() {
        let msg = Paragraph::new(format!("Pick sheet rejected: {err}"))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(msg, area);
        return;
    }

    let results = state.sorted_results();
    if results.is_empty() {
        let empty =
            Paragraph::new("No standings yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_standings_table(frame, columns[0], state, &results);
    render_pick_breakdown(frame, columns[1], state, &results);
}

fn render_standings_table(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    results: &[&ParticipantResult],
) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(7),
        Constraint::Length(10),
    ];
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, header_cols[0], "Rank", header_style);
    render_cell_text(frame, header_cols[1], "Player", header_style);
    render_cell_text(frame, header_cols[2], "Total", header_style);
    render_cell_text(frame, header_cols[3], "Unmatched", header_style);

    let list_area = sections[1];
    if list_area.height == 0 {
        return;
    }
    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, results.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let result = results[idx];
        let unmatched = result.unmatched().count();
        render_cell_text(frame, cols[0], &result.rank.to_string(), row_style);
        render_cell_text(frame, cols[1], &result.id, row_style);
        render_cell_text(frame, cols[2], &result.total.to_string(), row_style);
        let unmatched_style = if unmatched > 0 && !selected {
            Style::default().fg(Color::Red)
        } else {
            row_style
        };
        render_cell_text(frame, cols[3], &unmatched.to_string(), unmatched_style);
    }
}

fn render_pick_breakdown(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    results: &[&ParticipantResult],
) {
    let Some(result) = results.get(state.selected) else {
        return;
    };

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        format!(
            "{} — total {} ({} considered)",
            result.id, result.total, result.considered
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for pick in &result.picks {
        let (marker, style) = if !pick.matched {
            ("x", Style::default().fg(Color::Red))
        } else if pick.via_fallback {
            ("~", Style::default().fg(Color::Yellow))
        } else {
            ("+", Style::default())
        };
        let mut text = format!(" {marker} {}", pick.display());
        if !pick.counted {
            text.push_str("  [dropped]");
        }
        if pick.explicitly_unlisted {
            text.push_str("  [not listed]");
        }
        lines.push(Line::from(Span::styled(text, style)));
    }

    let pane = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .title("Pick breakdown"),
    );
    frame.render_widget(pane, area);
}

fn render_field(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(10),
    ];
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, header_cols[0], "Rank", header_style);
    render_cell_text(frame, header_cols[1], "Player", header_style);
    render_cell_text(frame, header_cols[2], "Position", header_style);

    let list_area = sections[1];
    if list_area.height == 0 {
        return;
    }
    if state.leaderboard.is_empty() {
        let empty =
            Paragraph::new("Field not loaded yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let competitors: Vec<_> = state.leaderboard.iter().collect();
    let visible = list_area.height as usize;
    let max_start = competitors.len().saturating_sub(visible);
    let start = state.field_scroll.min(max_start);
    let end = (start + visible).min(competitors.len());

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let competitor = competitors[idx];
        let position = match competitor.position {
            Some(p) => p.to_string(),
            None => "MC".to_string(),
        };
        let style = if competitor.position.is_none() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        render_cell_text(frame, cols[0], &competitor.rank.to_string(), style);
        render_cell_text(frame, cols[1], &competitor.display_name, style);
        render_cell_text(frame, cols[2], &position, style);
    }
}

fn render_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(area.height.saturating_sub(1) as usize)
        .rev()
        .map(|msg| Line::from(msg.as_str()))
        .collect();
    let pane = Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title("Log"));
    frame.render_widget(pane, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(52);
    let height = area.height.min(12);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let text = "\
j/k or arrows  move selection
s              toggle sort (placement/name)
f or Tab       field view
b or Esc       back to standings
r              refresh leaderboard
e              export standings CSV
x              export standings XLSX
?              toggle this help
q              quit";

    frame.render_widget(Clear, popup);
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Keys"));
    frame.render_widget(help, popup);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let cell = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(cell, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}
