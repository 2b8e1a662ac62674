use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::champion_image::DEFAULT_IMAGE_BASE_URL;
use crate::dataset::{Patch, StatsTable};

const APP_DIR: &str = "lcs_terminal";
const LOG_FILE: &str = "lcs_terminal.log";

const DEFAULT_STATS_CSV: &str = "data/champion_stats.csv";
const DEFAULT_GAMES_CSV: &str = "data/games.csv";
const DEFAULT_LEAGUE: &str = "LCS";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub stats_path: PathBuf,
    pub games_path: PathBuf,
    pub league: String,
    /// Explicit patch dropdown. `None` offers every patch in the dataset.
    pub patches: Option<Vec<Patch>>,
    pub image_base_url: String,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env.local`/`.env`, the process environment, then CLI flags.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| env(key).filter(|val| !val.trim().is_empty());

        let stats_path = arg_value(args, "--stats")
            .or_else(|| var("LCS_STATS_CSV"))
            .unwrap_or_else(|| DEFAULT_STATS_CSV.to_string());
        let games_path = arg_value(args, "--games")
            .or_else(|| var("LCS_GAMES_CSV"))
            .unwrap_or_else(|| DEFAULT_GAMES_CSV.to_string());
        let patches = match var("LCS_PATCHES") {
            Some(raw) => Some(parse_patch_list(&raw).context("LCS_PATCHES")?),
            None => None,
        };

        Ok(Self {
            stats_path: PathBuf::from(stats_path),
            games_path: PathBuf::from(games_path),
            league: var("LCS_LEAGUE").unwrap_or_else(|| DEFAULT_LEAGUE.to_string()),
            patches,
            image_base_url: var("LCS_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            log_filter: var("LCS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: var("LCS_LOG_FILE")
                .map(PathBuf::from)
                .or_else(|| default_log_path(&env)),
        })
    }

    /// Patch dropdown entries; the first one is the default selection.
    pub fn resolve_patches(&self, stats: &StatsTable) -> Vec<Patch> {
        match &self.patches {
            Some(patches) => patches.clone(),
            None => stats.patches(),
        }
    }
}

/// Comma separated patch labels, duplicates dropped, order kept.
pub fn parse_patch_list(raw: &str) -> Result<Vec<Patch>> {
    let mut patches: Vec<Patch> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let patch = part.parse::<Patch>()?;
        if !patches.contains(&patch) {
            patches.push(patch);
        }
    }
    if patches.is_empty() {
        bail!("no patches in {raw:?}");
    }
    Ok(patches)
}

pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

fn default_log_path(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(base) = env("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR).join(LOG_FILE));
        }
    }
    let home = env("HOME")?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR).join(LOG_FILE))
}
