//! Pokedex TUI
//!
//! Catalog browser for PokeAPI built on tui-dispatch. The library exposes the
//! state machine, fetch layer and renderer so they can be driven from tests.

pub mod action;
pub mod api;
pub mod effect;
pub mod filter;
pub mod logger;
pub mod present;
pub mod reducer;
pub mod state;
pub mod ui;
