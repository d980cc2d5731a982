// service.rs
// The aggregation engine: resolves a species key against the upstream API,
// gates it by generation range, and assembles the composite domain model
// from the primary record plus the encounter and evolution sub-resources.

use crate::config::UpstreamConfig;
use crate::error::AppError;
use crate::model::{
    Ability, Evolution, EvolutionDetail, Location, Move, Pokemon, PokemonType, Sprites,
};
use crate::upstream::{ChainLink, EncounterRecord, EvolutionChainRecord, SpeciesRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Highest species id in the supported generation range (generations 1-5).
pub const MAX_SPECIES_ID: u32 = 649;
/// Highest supported generation number.
pub const MAX_GENERATION: u32 = 5;
/// Sentinel generation for version slugs outside the lookup table.
const UNKNOWN_GENERATION: u32 = 999;

pub struct PokedexService {
    client: reqwest::Client,
    api_url: String,
}

impl PokedexService {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout as u64))
            .build()
            .map_err(|e| AppError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Looks up a species by name or numeric id. `Ok(None)` covers an unknown
    /// key, an id outside the supported range, and an unreachable upstream;
    /// only malformed upstream data surfaces as `Err`.
    pub async fn get_by_name_or_id(&self, name_or_id: &str) -> Result<Option<Pokemon>, AppError> {
        // The upstream is case-sensitive on names but accepts ids verbatim.
        let key = name_or_id.trim().to_lowercase();
        let url = format!("{}/pokemon/{}", self.api_url, key);

        let data: Value = match self.fetch_json(&url).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Primary lookup for {:?} failed: {}", key, e);
                return Ok(None);
            }
        };

        let id = required_u32(&data, "id")?;
        if !within_supported_range(id) {
            tracing::debug!(
                "Species id {} is beyond generation {}, skipping secondary lookups",
                id,
                MAX_GENERATION
            );
            return Ok(None);
        }

        self.assemble(id, &data).await.map(Some)
    }

    /// Draws a uniformly random id in [1, MAX_SPECIES_ID] and looks it up.
    /// Unassigned ids inside the range resolve to `Ok(None)`; callers retry.
    pub async fn get_random(&self) -> Result<Option<Pokemon>, AppError> {
        let id = random_species_id();
        tracing::debug!("Drew random species id {}", id);
        self.get_by_name_or_id(&id.to_string()).await
    }

    async fn assemble(&self, id: u32, data: &Value) -> Result<Pokemon, AppError> {
        let name = required_str(data, "name")?.to_string();
        let types = extract_types(data)?;
        let abilities = extract_abilities(data)?;
        let moves = extract_moves(data)?;
        let sprites = extract_sprites(data)?;

        // The two secondary lookups depend only on the resolved id and not on
        // each other.
        let (locations, evolution) =
            tokio::join!(self.sample_location(id), self.resolve_lineage(id));
        let evolution = evolution?;

        tracing::debug!("Assembled species {} (id {})", name, id);
        Ok(Pokemon {
            id,
            name,
            types,
            abilities,
            moves,
            locations,
            evolution,
            sprites,
        })
    }

    /// Fetches the encounter list for a species and narrows it to at most one
    /// uniformly sampled location. Encounter data is best-effort: any fetch
    /// failure yields an empty result.
    async fn sample_location(&self, id: u32) -> Vec<Location> {
        let url = format!("{}/pokemon/{}/encounters", self.api_url, id);
        let encounters: Vec<EncounterRecord> = match self.fetch_json(&url).await {
            Ok(encounters) => encounters,
            Err(e) => {
                tracing::warn!("Encounter lookup for species {} failed: {}", id, e);
                return Vec::new();
            }
        };

        sample_one(collect_location_candidates(&encounters))
    }

    /// Resolves the evolution lineage for a species. Fetch failures at either
    /// step yield an empty chain; a malformed species reference inside a
    /// successfully fetched chain is a hard error.
    async fn resolve_lineage(&self, id: u32) -> Result<Evolution, AppError> {
        let url = format!("{}/pokemon-species/{}", self.api_url, id);
        let species: SpeciesRecord = match self.fetch_json(&url).await {
            Ok(species) => species,
            Err(e) => {
                tracing::warn!("Species detail lookup for {} failed: {}", id, e);
                return Ok(Evolution::default());
            }
        };

        // The chain URL comes from the upstream response, not from the id.
        let record: EvolutionChainRecord =
            match self.fetch_json(&species.evolution_chain.url).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Evolution chain lookup for species {} failed: {}", id, e);
                    return Ok(Evolution::default());
                }
            };

        let mut chain = Vec::new();
        flatten_chain(&record.chain, &mut chain)?;
        Ok(Evolution { chain })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            AppError::from(e)
        })?;

        if !response.status().is_success() {
            let msg = format!("request to {} failed with status: {}", url, response.status());
            tracing::error!("{}", msg);
            return Err(AppError::UpstreamError(msg));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            AppError::UpstreamError(format!("JSON parsing failed: {}", e))
        })
    }
}

fn random_species_id() -> u32 {
    rand::random_range(1..=MAX_SPECIES_ID)
}

/// Range gate: only species in the first five generations are served.
fn within_supported_range(id: u32) -> bool {
    id <= MAX_SPECIES_ID
}

fn required_field<'a>(data: &'a Value, field: &str) -> Result<&'a Value, AppError> {
    data.get(field)
        .ok_or_else(|| AppError::MalformedData(format!("primary record is missing `{}`", field)))
}

fn required_u32(data: &Value, field: &str) -> Result<u32, AppError> {
    required_field(data, field)?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            AppError::MalformedData(format!("primary record field `{}` is not a valid id", field))
        })
}

fn required_str<'a>(data: &'a Value, field: &str) -> Result<&'a str, AppError> {
    required_field(data, field)?.as_str().ok_or_else(|| {
        AppError::MalformedData(format!("primary record field `{}` is not a string", field))
    })
}

fn extract_types(data: &Value) -> Result<Vec<PokemonType>, AppError> {
    nested_names(data, "types", "/type/name")
        .map(|names| names.into_iter().map(|name| PokemonType { name }).collect())
}

fn extract_moves(data: &Value) -> Result<Vec<Move>, AppError> {
    nested_names(data, "moves", "/move/name")
        .map(|names| names.into_iter().map(|name| Move { name }).collect())
}

fn extract_abilities(data: &Value) -> Result<Vec<Ability>, AppError> {
    let entries = required_field(data, "abilities")?.as_array().ok_or_else(|| {
        AppError::MalformedData("primary record field `abilities` is not an array".to_string())
    })?;

    entries
        .iter()
        .map(|entry| {
            let name = entry
                .pointer("/ability/name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    AppError::MalformedData("ability entry is missing `ability.name`".to_string())
                })?;
            let is_hidden = entry
                .get("is_hidden")
                .and_then(Value::as_bool)
                .ok_or_else(|| {
                    AppError::MalformedData("ability entry is missing `is_hidden`".to_string())
                })?;
            Ok(Ability {
                name: name.to_string(),
                is_hidden,
            })
        })
        .collect()
}

/// Walks an array-typed attribute of the primary record and pulls one nested
/// string out of each element. A missing element field is a contract
/// violation, not something to drop silently.
fn nested_names(data: &Value, field: &str, pointer: &str) -> Result<Vec<String>, AppError> {
    let entries = required_field(data, field)?.as_array().ok_or_else(|| {
        AppError::MalformedData(format!("primary record field `{}` is not an array", field))
    })?;

    entries
        .iter()
        .map(|entry| {
            entry
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::MalformedData(format!(
                        "`{}` entry is missing `{}`",
                        field,
                        pointer.trim_start_matches('/').replace('/', ".")
                    ))
                })
        })
        .collect()
}

/// The `sprites` object itself is a required attribute of the primary record;
/// within it, the two front-facing fields are optional and an absent or null
/// value resolves to an empty string rather than an error.
fn extract_sprites(data: &Value) -> Result<Sprites, AppError> {
    let sprites = required_field(data, "sprites")?;
    Ok(Sprites {
        default: sprite_url(sprites, "front_default"),
        shiny: sprite_url(sprites, "front_shiny"),
    })
}

fn sprite_url(sprites: &Value, field: &str) -> String {
    sprites
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// One candidate per encounter area: the first version that classifies into
/// the supported generation range tags the area, and the remaining versions
/// for that area are skipped.
fn collect_location_candidates(encounters: &[EncounterRecord]) -> Vec<Location> {
    let mut candidates = Vec::new();
    for encounter in encounters {
        for detail in &encounter.version_details {
            let generation_id = generation_from_version(&detail.version.name);
            if generation_id <= MAX_GENERATION {
                candidates.push(Location {
                    name: encounter.location_area.name.clone(),
                    generation_id,
                });
                break;
            }
        }
    }
    candidates
}

/// Uniformly draws one candidate; an empty candidate list stays empty.
fn sample_one(mut candidates: Vec<Location>) -> Vec<Location> {
    if candidates.is_empty() {
        return candidates;
    }
    let index = rand::random_range(0..candidates.len());
    vec![candidates.swap_remove(index)]
}

/// Closed version-slug to generation-number table. Slugs outside the table
/// resolve to the sentinel and never qualify.
fn generation_from_version(version: &str) -> u32 {
    match version {
        "red" | "blue" | "yellow" => 1,
        "gold" | "silver" | "crystal" => 2,
        "ruby" | "sapphire" | "emerald" | "firered" | "leafgreen" => 3,
        "diamond" | "pearl" | "platinum" | "heartgold" | "soulsilver" => 4,
        "black" | "white" | "black-2" | "white-2" => 5,
        _ => UNKNOWN_GENERATION,
    }
}

/// Pre-order flattening of the lineage tree: the node itself, then each
/// branch in upstream-declared order.
fn flatten_chain(link: &ChainLink, out: &mut Vec<EvolutionDetail>) -> Result<(), AppError> {
    out.push(EvolutionDetail {
        name: link.species.name.clone(),
        id: species_id_from_url(&link.species.url)?,
    });
    for next in &link.evolves_to {
        flatten_chain(next, out)?;
    }
    Ok(())
}

/// The species id lives in the second-to-last path segment of its reference
/// URL, e.g. `https://pokeapi.co/api/v2/pokemon-species/25/`.
fn species_id_from_url(url: &str) -> Result<u32, AppError> {
    let segments: Vec<&str> = url.split('/').collect();
    segments
        .len()
        .checked_sub(2)
        .and_then(|index| segments[index].parse::<u32>().ok())
        .ok_or_else(|| {
            AppError::MalformedData(format!("species reference URL has no id segment: {}", url))
        })
}
