use std::path::PathBuf;

use lcs_terminal::champion_image::DEFAULT_IMAGE_BASE_URL;
use lcs_terminal::config::parse_patch_list;
use lcs_terminal::dataset::{Position, StatsTable, load_stats_csv};
use lcs_terminal::projections::{ActiveCell, PickColumn};
use lcs_terminal::state::{AppState, NO_CHAMPION_PROMPT, Phase, Selection, UiEvent, apply_event};

fn fixture_stats() -> StatsTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("champion_stats.csv");
    load_stats_csv(&path).expect("fixture should load")
}

// Same dropdown as the LCS spring split dashboard: 13.05 has no rows.
fn spring_state(stats: &StatsTable) -> AppState {
    let patches = parse_patch_list("13.01,13.03,13.04,13.05").expect("valid patch list");
    AppState::new(stats, patches, "LCS", DEFAULT_IMAGE_BASE_URL)
}

#[test]
fn starts_on_first_patch_with_nothing_selected() {
    let stats = fixture_stats();
    let state = spring_state(&stats);
    assert_eq!(state.phase(), Phase::Initial);
    assert_eq!(state.selected_patch().map(|p| p.label()), Some("13.01"));
    assert_eq!(state.selection.active_cell, None);
    assert_eq!(state.pick_table.len(), 8);
    assert!(state.champion.is_none());
    assert_eq!(state.alert_text(), NO_CHAMPION_PROMPT);
}

#[test]
fn clicking_any_cell_selects_the_row_champion() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    let cell = ActiveCell::new(2, PickColumn::GamesPicked);
    apply_event(&mut state, &stats, UiEvent::ClickCell(cell));

    assert_eq!(state.phase(), Phase::ChampionSelected);
    assert_eq!(state.selection.active_cell, Some(cell));
    assert_eq!((state.cursor_row, state.cursor_col), (2, PickColumn::GamesPicked));
    let view = state.champion.as_ref().expect("champion view");
    assert_eq!(view.name, "K'Sante");
    assert_eq!(state.alert_text(), "K'Sante");
    assert_eq!(view.detail.len(), 1);
    assert_eq!(view.detail[0].role, Position::Top);
    assert_eq!(view.history.len(), 1);
    assert!(view.image_url.ends_with("/KSante_0.jpg"));
    assert!(state.logs.back().is_some_and(|l| l.contains("Selected K'Sante")));
}

#[test]
fn ahri_on_first_patch() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(0, PickColumn::Champion)),
    );

    let view = state.champion.as_ref().expect("champion view");
    assert_eq!(view.name, "Ahri");
    assert_eq!(view.detail.len(), 1);
    let detail = &view.detail[0];
    assert_eq!(detail.role, Position::Mid);
    assert_eq!((detail.pick, detail.ban, detail.win), (10.0, 5.0, 52.0));
    let history: Vec<(&str, f64)> = view
        .history
        .iter()
        .map(|p| (p.patch.label(), p.presence))
        .collect();
    assert_eq!(history, vec![("13.01", 15.0), ("13.03", 20.0)]);
}

#[test]
fn patch_change_clears_cell_and_champion() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(5, PickColumn::Role)),
    );
    assert_eq!(state.phase(), Phase::ChampionSelected);

    apply_event(&mut state, &stats, UiEvent::NextPatch);
    assert_eq!(state.phase(), Phase::PatchSelected);
    assert_eq!(state.selected_patch().map(|p| p.label()), Some("13.03"));
    assert_eq!(state.selection.active_cell, None);
    assert!(state.champion.is_none());
    assert_eq!(state.pick_table.len(), 4);
    assert_eq!(state.cursor_row, 3);
}

#[test]
fn stale_click_after_patch_change_is_ignored() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(6, PickColumn::Champion)),
    );
    apply_event(&mut state, &stats, UiEvent::SelectPatch(2));
    assert_eq!(state.pick_table.len(), 1);

    let before = state.clone();
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(6, PickColumn::Champion)),
    );
    assert_eq!(state, before);
    assert_eq!(state.phase(), Phase::PatchSelected);
}

#[test]
fn patch_without_rows_renders_empty_table() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(&mut state, &stats, UiEvent::SelectPatch(3));

    assert_eq!(state.selected_patch().map(|p| p.label()), Some("13.05"));
    assert!(state.pick_table.is_empty());
    assert_eq!(state.cursor_cell(), None);
    assert_eq!(state.cursor_row, 0);
    assert!(state.logs.back().is_some_and(|l| l.contains("[WARN]")));

    let before = state.clone();
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(0, PickColumn::Champion)),
    );
    assert_eq!(state, before);
}

#[test]
fn back_to_default_patch_without_click_is_initial() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(&mut state, &stats, UiEvent::PrevPatch);
    assert_eq!(state.selected_patch().map(|p| p.label()), Some("13.05"));
    assert_eq!(state.phase(), Phase::PatchSelected);

    apply_event(&mut state, &stats, UiEvent::NextPatch);
    assert_eq!(state.selected_patch().map(|p| p.label()), Some("13.01"));
    assert_eq!(state.phase(), Phase::Initial);
}

#[test]
fn out_of_range_patch_index_is_ignored() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    let before = state.clone();
    apply_event(&mut state, &stats, UiEvent::SelectPatch(9));
    assert_eq!(state, before);
}

#[test]
fn reselecting_current_patch_keeps_champion() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    apply_event(
        &mut state,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(0, PickColumn::Champion)),
    );
    let before = state.clone();

    apply_event(&mut state, &stats, UiEvent::SelectPatch(0));
    assert_eq!(state, before);
    assert_eq!(state.phase(), Phase::ChampionSelected);
    assert_eq!(state.champion.as_ref().map(|v| v.name.as_str()), Some("Ahri"));

    // A one-patch dropdown wraps onto itself.
    let patches = parse_patch_list("13.01").expect("valid patch list");
    let mut single = AppState::new(&stats, patches, "LCS", DEFAULT_IMAGE_BASE_URL);
    apply_event(
        &mut single,
        &stats,
        UiEvent::ClickCell(ActiveCell::new(1, PickColumn::Presence)),
    );
    apply_event(&mut single, &stats, UiEvent::NextPatch);
    apply_event(&mut single, &stats, UiEvent::PrevPatch);
    assert_eq!(single.phase(), Phase::ChampionSelected);
    assert_eq!(single.champion.as_ref().map(|v| v.name.as_str()), Some("Sejuani"));
}

#[test]
fn selection_transitions_are_pure() {
    let cell = ActiveCell::new(1, PickColumn::Presence);
    let picked = Selection::default().with_cell(cell);
    assert_eq!(picked.phase, Phase::ChampionSelected);
    assert_eq!(picked.active_cell, Some(cell));

    let same_patch = picked.with_patch(0);
    assert_eq!(same_patch.phase, Phase::PatchSelected);
    assert_eq!(same_patch.active_cell, None);

    let moved = Selection::default().with_patch(1);
    assert_eq!(moved.phase, Phase::PatchSelected);
    assert_eq!(moved.with_patch(0).phase, Phase::Initial);
}

#[test]
fn cursor_wraps_over_rows_and_columns() {
    let stats = fixture_stats();
    let mut state = spring_state(&stats);
    state.select_prev();
    assert_eq!(state.cursor_row, 7);
    state.select_next();
    assert_eq!(state.cursor_row, 0);
    state.cursor_left();
    assert_eq!(state.cursor_col, PickColumn::Presence);
    state.cursor_right();
    assert_eq!(state.cursor_col, PickColumn::Champion);
    assert_eq!(
        state.cursor_cell(),
        Some(ActiveCell::new(0, PickColumn::Champion))
    );
}

#[test]
fn no_patches_means_no_table() {
    let stats = StatsTable::default();
    let mut state = AppState::new(&stats, Vec::new(), "LCS", DEFAULT_IMAGE_BASE_URL);
    assert!(state.selected_patch().is_none());
    assert!(state.pick_table.is_empty());
    apply_event(&mut state, &stats, UiEvent::NextPatch);
    apply_event(&mut state, &stats, UiEvent::PrevPatch);
    assert_eq!(state.phase(), Phase::Initial);
}
