// upstream.rs
// Wire-format mirrors of the PokeAPI sub-resources the service fetches after
// the primary record: encounters, species detail, and the evolution chain.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct NamedApiResource {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiResourceRef {
    pub url: String,
}

/// One element of the `pokemon/{id}/encounters` array.
#[derive(Debug, Deserialize, Clone)]
pub struct EncounterRecord {
    pub location_area: NamedApiResource,
    pub version_details: Vec<VersionDetail>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VersionDetail {
    pub version: NamedApiResource,
}

/// The slice of `pokemon-species/{id}` the service needs: the reference to
/// the evolution-chain resource.
#[derive(Debug, Deserialize, Clone)]
pub struct SpeciesRecord {
    pub evolution_chain: ApiResourceRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EvolutionChainRecord {
    pub chain: ChainLink,
}

/// Recursive lineage node: a species plus the forms it evolves into, in
/// upstream-declared order.
#[derive(Debug, Deserialize, Clone)]
pub struct ChainLink {
    pub species: SpeciesRef,
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeciesRef {
    pub name: String,
    pub url: String,
}
