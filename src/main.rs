use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
};
use tracing::{info, warn};

use lcs_terminal::config::Config;
use lcs_terminal::dataset::{self, StatsTable};
use lcs_terminal::logging;
use lcs_terminal::projections::{
    ActiveCell, DETAIL_COLUMNS, HISTORY_COLUMNS, HistoryPoint, PickColumn,
};
use lcs_terminal::state::{AppState, UiEvent, apply_event};

struct App {
    state: AppState,
    stats: StatsTable,
    should_quit: bool,
    // Inner area of the pick table from the last frame, for mouse hits.
    pick_table_area: Option<Rect>,
}

impl App {
    fn new(state: AppState, stats: StatsTable) -> Self {
        Self {
            state,
            stats,
            should_quit: false,
            pick_table_area: None,
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        apply_event(&mut self.state, &self.stats, event);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('p') | KeyCode::Char(']') => self.dispatch(UiEvent::NextPatch),
            KeyCode::Char('P') | KeyCode::Char('[') => self.dispatch(UiEvent::PrevPatch),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as u8 - b'1') as usize;
                self.dispatch(UiEvent::SelectPatch(idx));
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('l') | KeyCode::Right => self.state.cursor_right(),
            KeyCode::Char('h') | KeyCode::Left => self.state.cursor_left(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(cell) = self.state.cursor_cell() {
                    self.dispatch(UiEvent::ClickCell(cell));
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(area) = self.pick_table_area else {
            return;
        };
        if let Some(cell) = pick_cell_at(area, mouse.column, mouse.row, self.state.pick_table.len())
        {
            self.dispatch(UiEvent::ClickCell(cell));
        }
    }
}

fn main() -> Result<()> {
    let config = Config::load()?;
    if let Some(path) = &config.log_file {
        if let Err(err) = logging::init_file_logging(&config.log_filter, path) {
            eprintln!("warning: file logging disabled: {err:#}");
        }
    }

    // Without stats there is nothing to show; fail before touching the terminal.
    let stats = dataset::load_stats_csv(&config.stats_path)?;
    let patches = config.resolve_patches(&stats);
    info!(
        rows = stats.len(),
        patches = patches.len(),
        path = %config.stats_path.display(),
        "stats loaded"
    );

    let mut state = AppState::new(&stats, patches, &config.league, &config.image_base_url);
    state.push_log(format!(
        "[INFO] Loaded {} stat rows from {}",
        stats.len(),
        config.stats_path.display()
    ));
    if stats.duplicate_count() > 0 {
        state.push_log(format!(
            "[WARN] {} repeated champion/patch rows",
            stats.duplicate_count()
        ));
    }
    match dataset::load_games_csv(&config.games_path) {
        Ok(games) => {
            state.games_rows = games.len();
            state.push_log(format!("[INFO] Loaded {} games", games.len()));
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "games table unavailable");
            state.push_log(format!("[WARN] Games table unavailable: {err}"));
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, stats);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    app.pick_table_area = Some(render_dashboard(frame, chunks[1], &app.state));

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let patch = match state.selected_patch() {
        Some(patch) => format!(
            "Patch {} ({}/{})",
            patch,
            state.selection.patch + 1,
            state.patches.len()
        ),
        None => "No patches".to_string(),
    };
    let line1 = format!(" LCS PATCH TERMINAL | {} | {}", state.league, patch);
    let line2 = format!(
        " {} stat rows | {} champions | {} games",
        state.stats_rows, state.champion_count, state.games_rows
    );
    format!("{line1}\n{line2}")
}

fn footer_text() -> &'static str {
    "p/] Next patch | P/[ Prev patch | 1-9 Patch | j/k/h/l Move | Enter Select | ? Help | q Quit"
}

/// Draws the three dashboard columns and returns the pick table's inner area.
fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(42),
            Constraint::Percentage(28),
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(8),
        ])
        .split(columns[1]);

    let table_area = render_pick_table(frame, columns[0], state);

    let alert_style = if state.champion.is_some() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let alert = Paragraph::new(state.alert_text())
        .style(alert_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(alert, middle[0]);

    render_detail_table(frame, middle[1], state);
    render_history_chart(frame, middle[2], state);
    render_portrait(frame, columns[2], state);

    table_area
}

fn pick_columns() -> [Constraint; 4] {
    [
        Constraint::Percentage(34),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ]
}

fn render_pick_table(frame: &mut Frame, area: Rect, state: &AppState) -> Rect {
    let title = match state.selected_patch() {
        Some(patch) => format!("Patch {patch}"),
        None => "Patch".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);

    if state.pick_table.is_empty() {
        let empty = Paragraph::new("No champions for this patch")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return inner;
    }

    let header = Row::new(PickColumn::ALL.iter().map(|col| Cell::from(col.label())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let active_row = state.selection.active_cell.map(|cell| cell.row);
    let rows = state.pick_table.iter().enumerate().map(|(idx, row)| {
        let cells = PickColumn::ALL.iter().map(|col| {
            let style = if idx == state.cursor_row && *col == state.cursor_col {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Cell::from(row.cell(*col)).style(style)
        });
        let row_style = if Some(idx) == active_row {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(cells).style(row_style)
    });

    let table = Table::new(rows, pick_columns())
        .header(header)
        .column_spacing(0)
        .block(block);
    frame.render_widget(table, area);
    inner
}

/// Maps a terminal position to a pick table cell. Row 0 of `inner` is the header.
fn pick_cell_at(inner: Rect, column: u16, row: u16, rows: usize) -> Option<ActiveCell> {
    if column < inner.x
        || column >= inner.x + inner.width
        || row <= inner.y
        || row >= inner.y + inner.height
    {
        return None;
    }
    let data_row = (row - inner.y - 1) as usize;
    if data_row >= rows {
        return None;
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(pick_columns())
        .split(inner);
    let col_idx = cols
        .iter()
        .position(|c| column >= c.x && column < c.x + c.width)?;
    Some(ActiveCell::new(data_row, PickColumn::from_index(col_idx)?))
}

fn render_detail_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Champion").borders(Borders::ALL);
    let Some(view) = &state.champion else {
        frame.render_widget(block, area);
        return;
    };
    if view.detail.is_empty() {
        let empty = Paragraph::new(format!("No rows for patch {}", view.patch))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(DETAIL_COLUMNS.iter().map(|label| Cell::from(*label)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.detail.iter().map(|row| Row::new(row.cells()));
    let table = Table::new(rows, [Constraint::Percentage(25); 4])
        .header(header)
        .block(block);
    frame.render_widget(table, area);
}

fn render_history_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = &state.champion else {
        let block = Block::default().title("Presence by Patch").borders(Borders::ALL);
        frame.render_widget(block, area);
        return;
    };
    let block = Block::default()
        .title(format!("{} Presence by Patch", view.name))
        .borders(Borders::ALL);
    if view.history.is_empty() {
        frame.render_widget(Paragraph::new("No history").block(block), area);
        return;
    }

    // Patches are categorical: plot by position, label with the patch text.
    let points: Vec<(f64, f64)> = view
        .history
        .iter()
        .enumerate()
        .map(|(idx, point)| (idx as f64, point.presence))
        .collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;
    let y_max = presence_axis_max(&view.history);

    let x_labels = view
        .history
        .iter()
        .map(|point| Span::raw(point.patch.label().to_string()))
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", y_max / 2.0)),
        Span::raw(format!("{y_max:.0}")),
    ];

    let datasets = vec![
        Dataset::default()
            .name(HISTORY_COLUMNS[1])
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(HISTORY_COLUMNS[0])
                .style(Style::default().fg(Color::Gray))
                .labels(x_labels)
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .title(HISTORY_COLUMNS[1])
                .style(Style::default().fg(Color::Gray))
                .labels(y_labels)
                .bounds([0.0, y_max]),
        );
    frame.render_widget(chart, area);
}

fn presence_axis_max(history: &[HistoryPoint]) -> f64 {
    let max = history
        .iter()
        .map(|point| point.presence)
        .fold(0.0_f64, f64::max);
    ((max / 10.0).ceil() * 10.0).clamp(10.0, 100.0)
}

fn render_portrait(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = match &state.champion {
        Some(view) => format!("{}\n\n{}", view.name, view.image_url),
        None => "No champion selected".to_string(),
    };
    let portrait = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Portrait").borders(Borders::ALL));
    frame.render_widget(portrait, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "LCS Patch Terminal - Help",
        "",
        "Patches:",
        "  p / ]        Next patch",
        "  P / [        Previous patch",
        "  1-9          Jump to patch N",
        "",
        "Pick table:",
        "  j/k or ↑/↓   Move row",
        "  h/l or ←/→   Move column",
        "  Enter/Space  Select champion",
        "  Mouse click  Select champion",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
