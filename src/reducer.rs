use std::collections::HashSet;

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api;
use crate::effect::Effect;
use crate::state::{AppState, CardSlot, CatalogEntry, DetailSlot, Selection};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            if state.catalog_requested {
                return DispatchResult::unchanged();
            }
            state.catalog_requested = true;
            state.catalog_loading = true;
            DispatchResult::changed_with(Effect::LoadCatalog {
                url: api::catalog_url(&state.catalog_base_url),
            })
        }

        Action::CatalogDidLoad(entries) => {
            if !state.catalog_loading {
                tracing::debug!("ignoring catalog result after the catalog settled");
                return DispatchResult::unchanged();
            }
            state.catalog = entries;
            state.catalog_loading = false;
            changed_with(reconcile_cards(state))
        }

        Action::CatalogDidError(_) => {
            if !state.catalog_loading {
                return DispatchResult::unchanged();
            }
            state.catalog_loading = false;
            DispatchResult::changed()
        }

        Action::CardDetailDidLoad {
            name,
            generation,
            detail,
        } => {
            let Some(slot) = live_card(state, &name, generation) else {
                return DispatchResult::unchanged();
            };
            slot.detail = Some(detail);
            slot.loading = false;
            DispatchResult::changed()
        }

        Action::CardDetailDidError {
            name, generation, ..
        } => {
            let Some(slot) = live_card(state, &name, generation) else {
                return DispatchResult::unchanged();
            };
            slot.detail = None;
            slot.loading = false;
            DispatchResult::changed()
        }

        Action::CursorMove(delta) => {
            let visible = state.visible_entries().len();
            if visible == 0 {
                return DispatchResult::unchanged();
            }
            let max = visible as i64 - 1;
            let next = (state.cursor as i64 + delta as i64).clamp(0, max) as usize;
            if next == state.cursor {
                return DispatchResult::unchanged();
            }
            state.cursor = next;
            DispatchResult::changed()
        }

        Action::CardActivate(name) => {
            let Some(entry) = state.catalog_entry(&name).cloned() else {
                return DispatchResult::unchanged();
            };
            if state.selection.entry() == Some(&entry) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(open_overlay(state, entry))
        }

        Action::OverlayClose => {
            if !state.selection.is_open() {
                return DispatchResult::unchanged();
            }
            state.selection = Selection::Closed;
            state.overlay = DetailSlot {
                generation: state.overlay.generation,
                detail: None,
                loading: false,
            };
            DispatchResult::changed_with(Effect::CancelOverlayDetail)
        }

        Action::OverlayDetailDidLoad { generation, detail } => {
            if !overlay_is_current(state, generation) {
                return DispatchResult::unchanged();
            }
            state.overlay.detail = Some(detail);
            state.overlay.loading = false;
            DispatchResult::changed()
        }

        Action::OverlayDetailDidError { generation, .. } => {
            if !overlay_is_current(state, generation) {
                return DispatchResult::unchanged();
            }
            state.overlay.detail = None;
            state.overlay.loading = false;
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            changed_with(reconcile_cards(state))
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            changed_with(reconcile_cards(state))
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            changed_with(reconcile_cards(state))
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.any_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Brings the card slots in line with the filtered view.
///
/// Cards that dropped out of the view lose their slot and their fetch is
/// cancelled; cards that entered it (or whose detail reference changed) get
/// a fresh slot and a fetch tagged with a new generation.
pub fn reconcile_cards(state: &mut AppState) -> Vec<Effect> {
    let visible = state.visible_entries();
    let live: HashSet<&str> = visible.iter().map(|entry| entry.name.as_str()).collect();
    let mut effects = Vec::new();

    let mut dropped: Vec<String> = state
        .cards
        .keys()
        .filter(|name| !live.contains(name.as_str()))
        .cloned()
        .collect();
    dropped.sort();
    for name in dropped {
        state.cards.remove(&name);
        effects.push(Effect::CancelCardDetail { name });
    }

    for entry in &visible {
        let current = state
            .cards
            .get(&entry.name)
            .is_some_and(|slot| slot.url == entry.url);
        if current {
            continue;
        }
        let generation = state.issue_generation();
        state.cards.insert(
            entry.name.clone(),
            CardSlot {
                url: entry.url.clone(),
                generation,
                detail: None,
                loading: true,
            },
        );
        effects.push(Effect::LoadCardDetail {
            name: entry.name.clone(),
            url: entry.url.clone(),
            generation,
        });
    }

    state.clamp_cursor(visible.len());
    effects
}

fn open_overlay(state: &mut AppState, entry: CatalogEntry) -> Effect {
    let generation = state.issue_generation();
    let url = entry.url.clone();
    state.selection = Selection::Open(entry);
    state.overlay = DetailSlot {
        generation,
        detail: None,
        loading: true,
    };
    Effect::LoadOverlayDetail { url, generation }
}

fn live_card<'a>(state: &'a mut AppState, name: &str, generation: u64) -> Option<&'a mut CardSlot> {
    match state.cards.get_mut(name) {
        Some(slot) if slot.generation == generation => Some(slot),
        Some(slot) => {
            tracing::debug!(
                name,
                generation,
                current = slot.generation,
                "dropping superseded card detail"
            );
            None
        }
        None => {
            tracing::debug!(name, generation, "dropping detail for card no longer shown");
            None
        }
    }
}

fn overlay_is_current(state: &AppState, generation: u64) -> bool {
    let current = state.selection.is_open() && state.overlay.generation == generation;
    if !current {
        tracing::debug!(
            generation,
            current = state.overlay.generation,
            "dropping superseded overlay detail"
        );
    }
    current
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}
