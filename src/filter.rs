//! Search narrowing of the catalog.

use crate::state::CatalogEntry;

/// Returns every entry whose name contains `term`, ignoring case, in catalog
/// order. An empty term keeps the whole catalog.
pub fn filter(catalog: &[CatalogEntry], term: &str) -> Vec<CatalogEntry> {
    if term.is_empty() {
        return catalog.to_vec();
    }
    let needle = term.to_lowercase();
    catalog
        .iter()
        .filter(|entry| matches(entry, &needle))
        .cloned()
        .collect()
}

fn matches(entry: &CatalogEntry, needle: &str) -> bool {
    entry.name.to_lowercase().contains(needle)
}
