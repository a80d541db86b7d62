//! End-to-end state flows driven through the store, with fetch completions
//! simulated by dispatching result actions in arbitrary order.

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, assert_emitted, assert_not_emitted};
use pokedex::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{AppState, CatalogEntry, DetailRecord, Selection, StatEntry},
};

fn entry(name: &str, id: u32) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

fn starters() -> Vec<CatalogEntry> {
    vec![
        entry("charmander", 4),
        entry("squirtle", 7),
        entry("charizard", 6),
    ]
}

fn detail(name: &str, id: u32) -> DetailRecord {
    DetailRecord {
        id,
        name: name.to_string(),
        sprite: None,
        types: vec!["fire".to_string()],
        abilities: vec!["blaze".to_string(), "solar-power".to_string()],
        stats: vec![StatEntry {
            name: "speed".to_string(),
            base: 65,
        }],
        height: 6,
        weight: 85,
    }
}

fn state_with_catalog() -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::Init);
    reducer(&mut state, Action::CatalogDidLoad(starters()));
    state
}

fn card_generation(state: &AppState, name: &str) -> u64 {
    state.card(name).map(|slot| slot.generation).unwrap()
}

#[test]
fn catalog_is_fetched_once_per_session() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.catalog_loading && s.catalog_requested);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadCatalog { url } if url.ends_with("/pokemon?limit=151")),
    );
}

#[test]
fn catalog_load_fans_out_card_fetches() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::CatalogDidLoad(starters()));

    harness.assert_state(|s| !s.catalog_loading);
    harness.assert_state(|s| s.catalog.len() == 3 && s.cards.len() == 3);
    let effects = harness.drain_effects();
    effects.effects_count(3);
    effects.effects_all_match(|e| matches!(e, Effect::LoadCardDetail { .. }));
}

#[test]
fn catalog_failure_leaves_app_usable() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::CatalogDidError("request failed: connection refused".into()));

    assert!(!store.state().catalog_loading);
    assert!(store.state().catalog.is_empty());

    let result = store.dispatch(Action::SearchInput('p'));
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert!(!store.dispatch(Action::Init).changed);
}

#[test]
fn card_results_tolerate_any_completion_order() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    let squirtle = card_generation(store.state(), "squirtle");
    let charmander = card_generation(store.state(), "charmander");

    store.dispatch(Action::CardDetailDidLoad {
        name: "squirtle".into(),
        generation: squirtle,
        detail: detail("squirtle", 7),
    });
    store.dispatch(Action::CardDetailDidError {
        name: "charmander".into(),
        generation: charmander,
        error: "server answered 500 Internal Server Error".into(),
    });

    let state = store.state();
    assert_eq!(state.card("squirtle").unwrap().detail.as_ref().unwrap().id, 7);
    let failed = state.card("charmander").unwrap();
    assert!(!failed.loading);
    assert!(failed.detail.is_none());
    assert!(state.card("charizard").unwrap().loading);
}

#[test]
fn stale_card_result_after_filtering_is_dropped() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    let squirtle = card_generation(store.state(), "squirtle");

    let result = store.dispatch(Action::SearchInput('c'));
    assert_eq!(
        result.effects,
        vec![Effect::CancelCardDetail {
            name: "squirtle".into()
        }]
    );
    let before = store.state().cards.clone();

    let result = store.dispatch(Action::CardDetailDidLoad {
        name: "squirtle".into(),
        generation: squirtle,
        detail: detail("squirtle", 7),
    });

    assert!(!result.changed);
    assert_eq!(store.state().cards, before);
}

#[test]
fn rerendered_card_ignores_its_previous_fetch() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    let old = card_generation(store.state(), "squirtle");

    store.dispatch(Action::SearchInput('c'));
    let result = store.dispatch(Action::SearchBackspace);
    assert_emitted!(result.effects, Effect::LoadCardDetail { .. });

    let fresh = card_generation(store.state(), "squirtle");
    assert!(fresh > old);

    let result = store.dispatch(Action::CardDetailDidLoad {
        name: "squirtle".into(),
        generation: old,
        detail: detail("squirtle", 7),
    });
    assert!(!result.changed);
    assert!(store.state().card("squirtle").unwrap().loading);
}

#[test]
fn surviving_cards_keep_their_fetch_when_search_narrows() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    let charizard = card_generation(store.state(), "charizard");

    let result = store.dispatch(Action::SearchInput('C'));
    assert_not_emitted!(result.effects, Effect::LoadCardDetail { .. });

    assert_eq!(card_generation(store.state(), "charizard"), charizard);
}

#[test]
fn selection_opens_and_closes() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);

    let result = store.dispatch(Action::CardActivate("squirtle".into()));
    assert_eq!(store.state().selection, Selection::Open(entry("squirtle", 7)));
    assert!(store.state().overlay.loading);
    assert_eq!(
        result.effects,
        vec![Effect::LoadOverlayDetail {
            url: "https://pokeapi.co/api/v2/pokemon/7/".into(),
            generation: store.state().overlay.generation,
        }]
    );

    let result = store.dispatch(Action::OverlayClose);
    assert_eq!(result.effects, vec![Effect::CancelOverlayDetail]);
    assert_eq!(store.state().selection, Selection::Closed);
    assert_eq!(store.state().selection.entry(), None);
    assert!(!store.state().overlay.loading);

    assert!(!store.dispatch(Action::OverlayClose).changed);
}

#[test]
fn selecting_another_entry_replaces_open_overlay() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    store.dispatch(Action::CardActivate("charmander".into()));
    let first = store.state().overlay.generation;

    let result = store.dispatch(Action::CardActivate("charizard".into()));

    assert!(result.changed);
    assert_eq!(store.state().selection, Selection::Open(entry("charizard", 6)));
    assert_not_emitted!(result.effects, Effect::CancelOverlayDetail);
    assert_emitted!(result.effects, Effect::LoadOverlayDetail { .. });
    assert!(store.state().overlay.generation > first);

    let result = store.dispatch(Action::OverlayDetailDidLoad {
        generation: first,
        detail: detail("charmander", 4),
    });
    assert!(!result.changed);
    assert!(store.state().overlay.detail.is_none());

    let current = store.state().overlay.generation;
    store.dispatch(Action::OverlayDetailDidLoad {
        generation: current,
        detail: detail("charizard", 6),
    });
    assert_eq!(store.state().overlay.detail.as_ref().unwrap().id, 6);
    assert!(!store.state().overlay.loading);
}

#[test]
fn overlay_result_after_close_is_dropped() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    store.dispatch(Action::CardActivate("squirtle".into()));
    let generation = store.state().overlay.generation;
    store.dispatch(Action::OverlayClose);

    let result = store.dispatch(Action::OverlayDetailDidLoad {
        generation,
        detail: detail("squirtle", 7),
    });

    assert!(!result.changed);
    assert!(store.state().overlay.detail.is_none());
}

#[test]
fn overlay_failure_keeps_shell_open() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    store.dispatch(Action::CardActivate("squirtle".into()));
    let generation = store.state().overlay.generation;

    store.dispatch(Action::OverlayDetailDidError {
        generation,
        error: "response parse error: expected value".into(),
    });

    assert!(store.state().selection.is_open());
    assert!(!store.state().overlay.loading);
    assert!(store.state().overlay.detail.is_none());
    assert!(store.dispatch(Action::OverlayClose).changed);
}

#[test]
fn overlay_fetch_is_independent_of_card_detail() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    let generation = card_generation(store.state(), "squirtle");
    store.dispatch(Action::CardDetailDidLoad {
        name: "squirtle".into(),
        generation,
        detail: detail("squirtle", 7),
    });

    let result = store.dispatch(Action::CardActivate("squirtle".into()));

    assert_emitted!(result.effects, Effect::LoadOverlayDetail { .. });
    assert!(store.state().overlay.detail.is_none());
    assert!(store.state().overlay.loading);
}

#[test]
fn selection_survives_filtering() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    store.dispatch(Action::CardActivate("squirtle".into()));

    store.dispatch(Action::SearchInput('c'));

    assert_eq!(store.state().selection, Selection::Open(entry("squirtle", 7)));
    assert!(store.state().card("squirtle").is_none());
}

#[test]
fn search_cancel_restores_full_catalog() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_all([
        Action::Init,
        Action::CatalogDidLoad(starters()),
        Action::SearchStart,
        Action::SearchInput('s'),
        Action::SearchInput('q'),
    ]);
    harness.assert_state(|s| s.search.active && s.visible_entries().len() == 1);
    harness.drain_effects();

    harness.dispatch_collect(Action::SearchCancel);

    harness.assert_state(|s| !s.search.active && s.search.query.is_empty());
    harness.assert_state(|s| s.cards.len() == 3);
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_all_match(|e| matches!(e, Effect::LoadCardDetail { .. }));
}

#[test]
fn search_submit_keeps_term() {
    let mut store = EffectStore::new(state_with_catalog(), reducer);
    store.dispatch(Action::SearchStart);
    store.dispatch(Action::SearchInput('x'));
    store.dispatch(Action::SearchSubmit);

    assert!(!store.state().search.active);
    assert_eq!(store.state().search.query, "x");
    assert!(store.state().visible_entries().is_empty());
    assert!(store.state().cards.is_empty());
}

#[test]
fn action_categories() {
    let did_load = Action::CatalogDidLoad(Vec::new());
    let resize = Action::UiTerminalResize(80, 24);

    assert_eq!(did_load.category(), Some("catalog_did"));
    assert_eq!(resize.category(), Some("ui_terminal"));
    assert_eq!(Action::Tick.category(), None);
    assert_eq!(Action::SearchInput('a').category(), None);
    assert!(did_load.is_catalog_did());
    assert!(resize.is_ui_terminal());
}
