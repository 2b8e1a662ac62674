use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use lcs_terminal::champion_image::{DEFAULT_IMAGE_BASE_URL, portrait_url};
use lcs_terminal::dataset::{Patch, StatsTable, parse_stats_csv};
use lcs_terminal::projections::{
    ActiveCell, PickColumn, champion_detail, champion_history, filter_patch,
};
use lcs_terminal::state::{AppState, UiEvent, apply_event};

const ROLES: [&str; 5] = ["Top", "Jungle", "Mid", "Bot", "Support"];

// A full split: 160 champions across 12 patches.
fn sample_stats() -> StatsTable {
    let mut raw = String::from("Champion,Pos,GP,P%,B%,P+B%,W%,Patch\n");
    for patch in 1..=12u32 {
        for champ in 0..160u32 {
            let pick = (champ * 7 + patch) % 60;
            let ban = (champ * 3 + patch * 5) % 40;
            raw.push_str(&format!(
                "Champ{champ},{},{},{pick},{ban},{},{},13.{patch:02}\n",
                ROLES[(champ % 5) as usize],
                (champ + patch) % 30,
                pick + ban,
                (champ * 11 + patch) % 100,
            ));
        }
    }
    parse_stats_csv(raw.as_bytes()).unwrap()
}

fn patch(label: &str) -> Patch {
    label.parse().unwrap()
}

fn bench_stats_parse(c: &mut Criterion) {
    let mut raw = String::from("Champion,Pos,GP,P%,B%,P+B%,W%,Patch\n");
    for idx in 0..2000u32 {
        raw.push_str(&format!(
            "Champ{idx},Mid,{},12.5%,4%,16.5%,51.2%,13.{:02}\n",
            idx % 30,
            idx % 12 + 1
        ));
    }
    c.bench_function("stats_parse", |b| {
        b.iter(|| {
            let stats = parse_stats_csv(black_box(raw.as_bytes())).unwrap();
            black_box(stats.len());
        })
    });
}

fn bench_patch_filter(c: &mut Criterion) {
    let stats = sample_stats();
    let target = patch("13.12");
    c.bench_function("patch_filter", |b| {
        b.iter(|| {
            let rows = filter_patch(black_box(&stats), black_box(&target));
            black_box(rows.len());
        })
    });
}

fn bench_champion_projections(c: &mut Criterion) {
    let stats = sample_stats();
    let target = patch("13.06");
    c.bench_function("champion_projections", |b| {
        b.iter(|| {
            let detail = champion_detail(black_box(&stats), "Champ42", &target);
            let history = champion_history(black_box(&stats), "Champ42");
            let url = portrait_url(DEFAULT_IMAGE_BASE_URL, "Champ42");
            black_box((detail.len(), history.len(), url.len()));
        })
    });
}

fn bench_click_event(c: &mut Criterion) {
    let stats = sample_stats();
    let state = AppState::new(&stats, stats.patches(), "LCS", DEFAULT_IMAGE_BASE_URL);
    c.bench_function("click_event", |b| {
        b.iter(|| {
            let mut state = state.clone();
            apply_event(
                &mut state,
                &stats,
                UiEvent::ClickCell(ActiveCell::new(3, PickColumn::Presence)),
            );
            black_box(state.champion.is_some());
        })
    });
}

criterion_group!(
    perf,
    bench_stats_parse,
    bench_patch_filter,
    bench_champion_projections,
    bench_click_event
);
criterion_main!(perf);
