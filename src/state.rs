use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{DebugSection, DebugState, ron_string};

use crate::api::CATALOG_BASE_URL;
use crate::filter;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// One item of the catalog: a name plus the URL of its detail record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<StatEntry>,
    pub height: u32,
    pub weight: u32,
}

impl DetailRecord {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    pub base: u16,
}

/// Detail-loading state owned by exactly one rendered card.
///
/// `generation` is the token handed to the fetch that fills this slot; a
/// result carrying any other token belongs to an earlier incarnation of the
/// card and is dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSlot {
    pub url: String,
    pub generation: u64,
    pub detail: Option<DetailRecord>,
    pub loading: bool,
}

/// Detail-loading state of the overlay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailSlot {
    pub generation: u64,
    pub detail: Option<DetailRecord>,
    pub loading: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Closed,
    Open(CatalogEntry),
}

impl Selection {
    pub fn entry(&self) -> Option<&CatalogEntry> {
        match self {
            Selection::Closed => None,
            Selection::Open(entry) => Some(entry),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Selection::Open(_))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub catalog_base_url: String,

    pub catalog: Vec<CatalogEntry>,
    pub catalog_loading: bool,
    pub catalog_requested: bool,

    pub search: SearchState,
    pub cursor: usize,
    pub cards: HashMap<String, CardSlot>,

    pub selection: Selection,
    pub overlay: DetailSlot,

    pub next_generation: u64,
    pub tick: u64,
}

impl AppState {
    pub fn new(catalog_base_url: impl Into<String>) -> Self {
        Self {
            terminal_size: (80, 24),
            catalog_base_url: catalog_base_url.into(),
            catalog: Vec::new(),
            catalog_loading: false,
            catalog_requested: false,
            search: SearchState::default(),
            cursor: 0,
            cards: HashMap::new(),
            selection: Selection::Closed,
            overlay: DetailSlot::default(),
            next_generation: 0,
            tick: 0,
        }
    }

    /// The catalog narrowed by the current search term.
    pub fn visible_entries(&self) -> Vec<CatalogEntry> {
        filter::filter(&self.catalog, &self.search.query)
    }

    pub fn cursor_entry(&self) -> Option<CatalogEntry> {
        self.visible_entries().into_iter().nth(self.cursor)
    }

    pub fn card(&self, name: &str) -> Option<&CardSlot> {
        self.cards.get(name)
    }

    pub fn catalog_entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.catalog.iter().find(|entry| entry.name == name)
    }

    /// Hands out the next fetch token. Tokens are never reused within a session.
    pub fn issue_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn clamp_cursor(&mut self, visible: usize) {
        if visible == 0 {
            self.cursor = 0;
        } else if self.cursor >= visible {
            self.cursor = visible - 1;
        }
    }

    pub fn cards_loading(&self) -> usize {
        self.cards.values().filter(|slot| slot.loading).count()
    }

    pub fn any_loading(&self) -> bool {
        self.catalog_loading || self.overlay.loading || self.cards_loading() > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CATALOG_BASE_URL)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("total", ron_string(&self.catalog.len()))
                .entry("loading", ron_string(&self.catalog_loading))
                .entry("requested", ron_string(&self.catalog_requested))
                .entry("base_url", ron_string(&self.catalog_base_url)),
            DebugSection::new("Cards")
                .entry("rendered", ron_string(&self.cards.len()))
                .entry("loading", ron_string(&self.cards_loading()))
                .entry("cursor", ron_string(&self.cursor))
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active)),
            DebugSection::new("Overlay")
                .entry(
                    "selected",
                    ron_string(&self.selection.entry().map(|entry| entry.name.clone())),
                )
                .entry("generation", ron_string(&self.overlay.generation))
                .entry("loading", ron_string(&self.overlay.loading))
                .entry(
                    "detail",
                    ron_string(&self.overlay.detail.as_ref().map(|detail| detail.id)),
                ),
        ]
    }
}
