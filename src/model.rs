// model.rs
// The assembled domain model returned to callers. Built fresh per request,
// never persisted.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub abilities: Vec<Ability>,
    pub moves: Vec<Move>,
    /// At most one entry: a uniformly sampled encounter location.
    pub locations: Vec<Location>,
    pub evolution: Evolution,
    pub sprites: Sprites,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PokemonType {
    pub name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Move {
    pub name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub generation_id: u32,
}

/// The evolution lineage, flattened to pre-order. Branch points appear as
/// consecutive siblings in traversal order.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Evolution {
    pub chain: Vec<EvolutionDetail>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EvolutionDetail {
    pub name: String,
    pub id: u32,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Sprites {
    /// Front-facing default sprite URL; empty when the upstream has none.
    pub default: String,
    /// Front-facing shiny sprite URL; empty when the upstream has none.
    pub shiny: String,
}
