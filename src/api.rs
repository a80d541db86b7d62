use std::sync::OnceLock;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::state::{CatalogEntry, DetailRecord, StatEntry};

pub const CATALOG_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon";
pub const CATALOG_LIMIT: u16 = 151;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("server answered {status}")]
    Status { status: reqwest::StatusCode },
    #[error("response parse error: {0}")]
    Parse(#[source] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct NameOnly {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    sprites: PokemonSprites,
    types: Vec<PokemonTypeSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    stats: Vec<PokemonStatSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSprites {
    front_default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NameOnly,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NameOnly,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NameOnly,
}

pub fn catalog_url(base: &str) -> String {
    format!("{base}?limit={CATALOG_LIMIT}")
}

/// Fetches the catalog, keeping the server's ordering.
pub async fn fetch_catalog(url: &str) -> Result<Vec<CatalogEntry>, FetchError> {
    let response: ListResponse = fetch_json(url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| CatalogEntry {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

pub async fn fetch_detail(url: &str) -> Result<DetailRecord, FetchError> {
    let response: PokemonResponse = fetch_json(url).await?;
    Ok(DetailRecord {
        id: response.id,
        name: response.name,
        sprite: response.sprites.front_default,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| StatEntry {
                name: slot.stat.name,
                base: slot.base_stat,
            })
            .collect(),
        height: response.height,
        weight: response.weight,
    })
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    tracing::debug!(%url, "GET");
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(FetchError::Request)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { status });
    }
    let bytes = response.bytes().await.map_err(FetchError::Request)?;
    serde_json::from_slice(&bytes).map_err(FetchError::Parse)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
