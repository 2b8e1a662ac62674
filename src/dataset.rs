use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("invalid patch label {0:?} (expected <major>.<minor>)")]
    InvalidPatch(String),
    #[error("unknown position {0:?}")]
    UnknownPosition(String),
    #[error("invalid percentage {0:?}")]
    InvalidPercent(String),
}

/// Game patch label. Ordered by release (major, then minor), never by string.
#[derive(Debug, Clone)]
pub struct Patch {
    major: u16,
    minor: u16,
    label: String,
}

impl Patch {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for Patch {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let label = raw.trim();
        let (major, minor) = label
            .split_once('.')
            .ok_or_else(|| DatasetError::InvalidPatch(raw.to_string()))?;
        let major = major
            .parse::<u16>()
            .map_err(|_| DatasetError::InvalidPatch(raw.to_string()))?;
        let minor = minor
            .parse::<u16>()
            .map_err(|_| DatasetError::InvalidPatch(raw.to_string()))?;
        Ok(Self {
            major,
            minor,
            label: label.to_string(),
        })
    }
}

impl PartialEq for Patch {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl Eq for Patch {}

impl Hash for Patch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
    }
}

impl PartialOrd for Patch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Patch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::Top => "Top",
            Position::Jungle => "Jungle",
            Position::Mid => "Mid",
            Position::Bot => "Bot",
            Position::Support => "Support",
        }
    }
}

impl FromStr for Position {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Position::Top),
            "jungle" | "jng" | "jgl" => Ok(Position::Jungle),
            "mid" | "middle" => Ok(Position::Mid),
            "bot" | "bottom" | "adc" => Ok(Position::Bot),
            "support" | "sup" | "supp" => Ok(Position::Support),
            _ => Err(DatasetError::UnknownPosition(raw.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One aggregated (champion, patch) row of the statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub champion: String,
    pub position: Position,
    pub patch: Patch,
    pub games_played: u32,
    pub pick_percent: f64,
    pub ban_percent: f64,
    pub presence_percent: f64,
    pub win_percent: f64,
}

#[derive(Debug, Deserialize)]
struct RawStatRow {
    #[serde(rename = "Champion")]
    champion: String,
    #[serde(rename = "Pos", alias = "Position")]
    position: String,
    #[serde(rename = "Patch")]
    patch: String,
    #[serde(rename = "GP", alias = "GamesPlayed")]
    games_played: u32,
    #[serde(rename = "P%", alias = "PickPercent")]
    pick: String,
    #[serde(rename = "B%", alias = "BanPercent")]
    ban: String,
    #[serde(rename = "P+B%", alias = "PresencePercent")]
    presence: String,
    #[serde(rename = "W%", alias = "WinPercent")]
    win: String,
}

impl TryFrom<RawStatRow> for StatRow {
    type Error = DatasetError;

    fn try_from(raw: RawStatRow) -> Result<Self, Self::Error> {
        Ok(StatRow {
            position: raw.position.parse()?,
            patch: raw.patch.parse()?,
            games_played: raw.games_played,
            pick_percent: parse_percent(&raw.pick)?,
            ban_percent: parse_percent(&raw.ban)?,
            presence_percent: parse_percent(&raw.presence)?,
            win_percent: parse_percent(&raw.win)?,
            champion: raw.champion,
        })
    }
}

/// Read-only statistics table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    rows: Vec<StatRow>,
    duplicates: usize,
}

impl StatsTable {
    pub fn from_rows(rows: Vec<StatRow>) -> Self {
        let duplicates = {
            let mut seen = HashSet::with_capacity(rows.len());
            rows.iter()
                .filter(|row| !seen.insert((row.champion.as_str(), &row.patch)))
                .count()
        };
        if duplicates > 0 {
            warn!(duplicates, "stats table has repeated (champion, patch) rows");
        }
        Self { rows, duplicates }
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sharing a (champion, patch) pair with an earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Distinct patches present in the table, in release order.
    pub fn patches(&self) -> Vec<Patch> {
        let mut patches: Vec<Patch> = self
            .rows
            .iter()
            .map(|row| row.patch.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        patches.sort();
        patches
    }

    pub fn champion_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.champion.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Games table. Kept as raw records; nothing projects over it yet.
#[derive(Debug, Clone, Default)]
pub struct GamesTable {
    pub headers: Vec<String>,
    pub records: Vec<csv::StringRecord>,
}

impl GamesTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_stats_csv(path: &Path) -> Result<StatsTable> {
    let file = File::open(path).with_context(|| format!("open stats csv {}", path.display()))?;
    let table =
        parse_stats_csv(file).with_context(|| format!("parse stats csv {}", path.display()))?;
    debug!(path = %path.display(), rows = table.len(), "loaded stats table");
    Ok(table)
}

pub fn parse_stats_csv<R: Read>(reader: R) -> Result<StatsTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<RawStatRow>().enumerate() {
        // Header occupies line 1.
        let line = idx + 2;
        let raw = record.with_context(|| format!("line {line}: malformed record"))?;
        let row = StatRow::try_from(raw).with_context(|| format!("line {line}"))?;
        rows.push(row);
    }
    Ok(StatsTable::from_rows(rows))
}

pub fn load_games_csv(path: &Path) -> Result<GamesTable> {
    let file = File::open(path).with_context(|| format!("open games csv {}", path.display()))?;
    parse_games_csv(file).with_context(|| format!("parse games csv {}", path.display()))
}

pub fn parse_games_csv<R: Read>(reader: R) -> Result<GamesTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .context("read games header")?
        .iter()
        .map(str::to_string)
        .collect();
    let records = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .context("read games records")?;
    Ok(GamesTable { headers, records })
}

/// Accepts `45.5`, `45.5%` or blank (treated as zero).
pub fn parse_percent(raw: &str) -> Result<f64, DatasetError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if number.is_empty() {
        return Ok(0.0);
    }
    let value = number
        .parse::<f64>()
        .map_err(|_| DatasetError::InvalidPercent(raw.to_string()))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(DatasetError::InvalidPercent(raw.to_string()));
    }
    Ok(value)
}
