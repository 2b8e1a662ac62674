use anyhow::{Context, Result, bail};

use lcs_terminal::champion_image;
use lcs_terminal::config::{self, Config};
use lcs_terminal::dataset::{self, Patch};
use lcs_terminal::logging;
use lcs_terminal::projections::{self, DETAIL_COLUMNS, HISTORY_COLUMNS, PickColumn};

fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init_stderr_logging(&config.log_filter)?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let stats = dataset::load_stats_csv(&config.stats_path)?;
    let patches = config.resolve_patches(&stats);

    let patch = match config::arg_value(&args, "--patch") {
        Some(raw) => raw.parse::<Patch>().context("--patch")?,
        None => match patches.first() {
            Some(patch) => patch.clone(),
            None => bail!("no patches in {}", config.stats_path.display()),
        },
    };

    println!("{} | Patch {}", config.league, patch);
    let table = projections::filter_patch(&stats, &patch);
    if table.is_empty() {
        println!("No champions for this patch");
    } else {
        let header = PickColumn::ALL
            .iter()
            .map(|col| format!("{:<14}", col.label()))
            .collect::<String>();
        println!("{}", header.trim_end());
        for row in &table {
            let line = PickColumn::ALL
                .iter()
                .map(|col| format!("{:<14}", row.cell(*col)))
                .collect::<String>();
            println!("{}", line.trim_end());
        }
    }

    let Some(champion) = config::arg_value(&args, "--champion") else {
        return Ok(());
    };

    println!();
    println!("{champion}");
    let detail = projections::champion_detail(&stats, &champion, &patch);
    if detail.is_empty() {
        println!("No rows for patch {patch}");
    } else {
        println!("{}", DETAIL_COLUMNS.join(" | "));
        for row in &detail {
            println!("{}", row.cells().join(" | "));
        }
    }

    println!();
    println!("{}", HISTORY_COLUMNS.join(" | "));
    for point in projections::champion_history(&stats, &champion) {
        println!(
            "{} | {}",
            point.patch,
            projections::format_percent(point.presence)
        );
    }

    println!();
    println!(
        "Portrait: {}",
        champion_image::portrait_url(&config.image_base_url, &champion)
    );
    Ok(())
}
