use serde::{Deserialize, Serialize};

use crate::state::{CatalogEntry, DetailRecord};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    /// Startup intent: requests the catalog on first dispatch only
    Init,

    // ===== Catalog results =====
    /// Result: catalog entries in server order
    CatalogDidLoad(Vec<CatalogEntry>),

    /// Result: catalog fetch failed; the app continues with an empty catalog
    CatalogDidError(String),

    // ===== Card results =====
    /// Result: detail for a rendered card. `generation` must match the card's
    /// current slot or the result is dropped.
    CardDetailDidLoad {
        name: String,
        generation: u64,
        detail: DetailRecord,
    },
    CardDetailDidError {
        name: String,
        generation: u64,
        error: String,
    },

    // ===== Navigation =====
    /// Move the grid cursor by a signed offset (clamped)
    CursorMove(i16),

    /// Select the named catalog entry and open its overlay
    CardActivate(String),

    // ===== Overlay =====
    OverlayClose,
    OverlayDetailDidLoad {
        generation: u64,
        detail: DetailRecord,
    },
    OverlayDetailDidError {
        generation: u64,
        error: String,
    },

    // ===== Search editing =====
    SearchStart,
    /// Leave search mode and clear the term
    SearchCancel,
    /// Leave search mode keeping the term
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    // ===== Terminal =====
    UiTerminalResize(u16, u16),

    // ===== Global =====
    /// Animation frame for spinners and skeletons
    Tick,
    Quit,
}
