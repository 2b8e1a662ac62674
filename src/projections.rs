//! Stateless views over the statistics table: the per-patch pick table, the
//! cell-to-champion lookup, and the per-champion detail and history views.

use thiserror::Error;

use crate::dataset::{Patch, Position, StatsTable};

/// Rows shown in the per-patch pick table.
pub const PICK_TABLE_ROWS: usize = 8;

pub const DETAIL_COLUMNS: [&str; 4] = ["Role", "Pick %", "Ban %", "Win Rate"];
pub const HISTORY_COLUMNS: [&str; 2] = ["Patch", "Presence"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickColumn {
    Champion,
    Role,
    GamesPicked,
    Presence,
}

impl PickColumn {
    pub const ALL: [PickColumn; 4] = [
        PickColumn::Champion,
        PickColumn::Role,
        PickColumn::GamesPicked,
        PickColumn::Presence,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PickColumn::Champion => "Champion",
            PickColumn::Role => "Role",
            PickColumn::GamesPicked => "Games Picked",
            PickColumn::Presence => "Presence",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PickColumn::Champion => 0,
            PickColumn::Role => 1,
            PickColumn::GamesPicked => 2,
            PickColumn::Presence => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickRow {
    pub champion: String,
    pub role: Position,
    pub games_picked: u32,
    pub presence: f64,
}

impl PickRow {
    pub fn cell(&self, column: PickColumn) -> String {
        match column {
            PickColumn::Champion => self.champion.clone(),
            PickColumn::Role => self.role.label().to_string(),
            PickColumn::GamesPicked => self.games_picked.to_string(),
            PickColumn::Presence => format_percent(self.presence),
        }
    }
}

/// A clicked cell of the pick table currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCell {
    pub row: usize,
    pub column: PickColumn,
}

impl ActiveCell {
    pub fn new(row: usize, column: PickColumn) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("row {row} is outside the {len}-row pick table")]
    OutOfRange { row: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub role: Position,
    pub pick: f64,
    pub ban: f64,
    pub win: f64,
}

impl DetailRow {
    pub fn cells(&self) -> [String; 4] {
        [
            self.role.label().to_string(),
            format_percent(self.pick),
            format_percent(self.ban),
            format_percent(self.win),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub patch: Patch,
    pub presence: f64,
}

/// First `PICK_TABLE_ROWS` rows of `patch`, in source order. An unknown patch
/// yields an empty table.
pub fn filter_patch(stats: &StatsTable, patch: &Patch) -> Vec<PickRow> {
    stats
        .rows()
        .iter()
        .filter(|row| &row.patch == patch)
        .take(PICK_TABLE_ROWS)
        .map(|row| PickRow {
            champion: row.champion.clone(),
            role: row.position,
            games_picked: row.games_played,
            presence: row.presence_percent,
        })
        .collect()
}

/// Champion of the clicked row; the clicked column does not matter.
pub fn resolve_champion(cell: ActiveCell, table: &[PickRow]) -> Result<&str, SelectionError> {
    table
        .get(cell.row)
        .map(|row| row.champion.as_str())
        .ok_or(SelectionError::OutOfRange {
            row: cell.row,
            len: table.len(),
        })
}

/// One row per role the champion was played in on `patch`.
pub fn champion_detail(stats: &StatsTable, champion: &str, patch: &Patch) -> Vec<DetailRow> {
    stats
        .rows()
        .iter()
        .filter(|row| row.champion == champion && &row.patch == patch)
        .map(|row| DetailRow {
            role: row.position,
            pick: row.pick_percent,
            ban: row.ban_percent,
            win: row.win_percent,
        })
        .collect()
}

/// Presence per patch in release order, one point per patch.
pub fn champion_history(stats: &StatsTable, champion: &str) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = stats
        .rows()
        .iter()
        .filter(|row| row.champion == champion)
        .map(|row| HistoryPoint {
            patch: row.patch.clone(),
            presence: row.presence_percent,
        })
        .collect();
    // Stable sort, so for a repeated patch the earliest source row survives dedup.
    points.sort_by(|a, b| a.patch.cmp(&b.patch));
    points.dedup_by(|later, earlier| later.patch == earlier.patch);
    points
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}")
}
