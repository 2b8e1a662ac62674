use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::champion_image;
use crate::dataset::{Patch, StatsTable};
use crate::projections::{
    self, ActiveCell, DetailRow, HistoryPoint, PickColumn, PickRow, SelectionError,
};

pub const NO_CHAMPION_PROMPT: &str = "Please select a champion from the left table";

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Default patch, nothing clicked yet.
    Initial,
    /// Patch changed; any earlier champion selection was dropped.
    PatchSelected,
    ChampionSelected,
}

/// The user-driven part of the dashboard state. Transitions are pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub patch: usize,
    pub active_cell: Option<ActiveCell>,
    pub phase: Phase,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            patch: 0,
            active_cell: None,
            phase: Phase::Initial,
        }
    }
}

impl Selection {
    /// Always clears the active cell: its row index refers to the old table.
    pub fn with_patch(self, patch: usize) -> Self {
        let phase = if patch == 0 && self.active_cell.is_none() {
            Phase::Initial
        } else {
            Phase::PatchSelected
        };
        Self {
            patch,
            active_cell: None,
            phase,
        }
    }

    pub fn with_cell(self, cell: ActiveCell) -> Self {
        Self {
            patch: self.patch,
            active_cell: Some(cell),
            phase: Phase::ChampionSelected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionView {
    pub name: String,
    pub patch: Patch,
    pub detail: Vec<DetailRow>,
    pub history: Vec<HistoryPoint>,
    pub image_url: String,
}

impl ChampionView {
    pub fn build(stats: &StatsTable, champion: &str, patch: &Patch, image_base_url: &str) -> Self {
        Self {
            name: champion.to_string(),
            patch: patch.clone(),
            detail: projections::champion_detail(stats, champion, patch),
            history: projections::champion_history(stats, champion),
            image_url: champion_image::portrait_url(image_base_url, champion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    SelectPatch(usize),
    NextPatch,
    PrevPatch,
    ClickCell(ActiveCell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub league: String,
    pub patches: Vec<Patch>,
    pub selection: Selection,
    pub pick_table: Vec<PickRow>,
    pub champion: Option<ChampionView>,
    pub cursor_row: usize,
    pub cursor_col: PickColumn,
    pub image_base_url: String,
    pub stats_rows: usize,
    pub champion_count: usize,
    pub games_rows: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(
        stats: &StatsTable,
        patches: Vec<Patch>,
        league: impl Into<String>,
        image_base_url: impl Into<String>,
    ) -> Self {
        let pick_table = patches
            .first()
            .map(|patch| projections::filter_patch(stats, patch))
            .unwrap_or_default();
        Self {
            league: league.into(),
            patches,
            selection: Selection::default(),
            pick_table,
            champion: None,
            cursor_row: 0,
            cursor_col: PickColumn::Champion,
            image_base_url: image_base_url.into(),
            stats_rows: stats.len(),
            champion_count: stats.champion_count(),
            games_rows: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn selected_patch(&self) -> Option<&Patch> {
        self.patches.get(self.selection.patch)
    }

    pub fn phase(&self) -> Phase {
        self.selection.phase
    }

    /// Champion name for the alert line, or the selection prompt.
    pub fn alert_text(&self) -> &str {
        self.champion
            .as_ref()
            .map(|view| view.name.as_str())
            .unwrap_or(NO_CHAMPION_PROMPT)
    }

    pub fn cursor_cell(&self) -> Option<ActiveCell> {
        if self.pick_table.is_empty() {
            return None;
        }
        Some(ActiveCell::new(self.cursor_row, self.cursor_col))
    }

    pub fn select_next(&mut self) {
        let total = self.pick_table.len();
        if total == 0 {
            self.cursor_row = 0;
            return;
        }
        self.cursor_row = (self.cursor_row + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.pick_table.len();
        if total == 0 {
            self.cursor_row = 0;
            return;
        }
        if self.cursor_row == 0 {
            self.cursor_row = total - 1;
        } else {
            self.cursor_row -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        let next = (self.cursor_col.index() + 1) % PickColumn::ALL.len();
        self.cursor_col = PickColumn::from_index(next).unwrap_or(PickColumn::Champion);
    }

    pub fn cursor_left(&mut self) {
        let count = PickColumn::ALL.len();
        let prev = (self.cursor_col.index() + count - 1) % count;
        self.cursor_col = PickColumn::from_index(prev).unwrap_or(PickColumn::Champion);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn clamp_cursor(&mut self) {
        let total = self.pick_table.len();
        if total == 0 {
            self.cursor_row = 0;
        } else if self.cursor_row >= total {
            self.cursor_row = total - 1;
        }
    }
}

/// Runs one user event to completion against the read-only stats table.
pub fn apply_event(state: &mut AppState, stats: &StatsTable, event: UiEvent) {
    match event {
        UiEvent::SelectPatch(idx) => change_patch(state, stats, idx),
        UiEvent::NextPatch => {
            if state.patches.is_empty() {
                return;
            }
            let idx = (state.selection.patch + 1) % state.patches.len();
            change_patch(state, stats, idx);
        }
        UiEvent::PrevPatch => {
            let total = state.patches.len();
            if total == 0 {
                return;
            }
            let idx = (state.selection.patch + total - 1) % total;
            change_patch(state, stats, idx);
        }
        UiEvent::ClickCell(cell) => {
            if let Err(err) = click_cell(state, stats, cell) {
                // The pick table changed under a held index; drop the click.
                warn!(%err, "ignoring pick table click");
            }
        }
    }
}

fn change_patch(state: &mut AppState, stats: &StatsTable, idx: usize) {
    let Some(patch) = state.patches.get(idx).cloned() else {
        warn!(idx, total = state.patches.len(), "patch index out of range");
        return;
    };
    // Re-picking the current patch is not a change.
    if idx == state.selection.patch {
        return;
    }
    state.selection = state.selection.with_patch(idx);
    state.pick_table = projections::filter_patch(stats, &patch);
    state.champion = None;
    state.clamp_cursor();
    info!(patch = %patch, rows = state.pick_table.len(), "patch selected");
    if state.pick_table.is_empty() {
        state.push_log(format!("[WARN] Patch {patch}: no champion rows"));
    } else {
        state.push_log(format!(
            "[INFO] Patch {patch}: {} champions",
            state.pick_table.len()
        ));
    }
}

fn click_cell(
    state: &mut AppState,
    stats: &StatsTable,
    cell: ActiveCell,
) -> Result<(), SelectionError> {
    let champion = projections::resolve_champion(cell, &state.pick_table)?.to_string();
    // A non-empty pick table implies a selected patch.
    let Some(patch) = state.selected_patch().cloned() else {
        return Err(SelectionError::OutOfRange {
            row: cell.row,
            len: 0,
        });
    };

    let view = ChampionView::build(stats, &champion, &patch, &state.image_base_url);
    debug!(
        champion = %champion,
        patch = %patch,
        detail_rows = view.detail.len(),
        history_points = view.history.len(),
        "champion selected"
    );
    state.selection = state.selection.with_cell(cell);
    state.cursor_row = cell.row;
    state.cursor_col = cell.column;
    state.champion = Some(view);
    state.push_log(format!("[INFO] Selected {champion} ({patch})"));
    Ok(())
}
