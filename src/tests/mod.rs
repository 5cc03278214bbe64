mod json;
mod storage;

use async_trait::async_trait;
use rocket::local::blocking::Client;
use serde_json::json;

use crate::{
    build_rocket,
    config::{Config, StorageBackend},
    pokemon::{
        PokemonDefinition,
        lookup::{LookupError, PokemonLookup},
    },
    storage::StoreGateway,
};

/// Serves a fixed set of definitions instead of calling PokeAPI
pub struct StubLookup;

#[async_trait]
impl PokemonLookup for StubLookup {
    async fn find_pokemon(&self, name: &str) -> Result<PokemonDefinition, LookupError> {
        match name {
            "pikachu" => Ok(definition("pikachu", 35)),
            "bulbasaur" => Ok(definition("bulbasaur", 1)),
            other => Err(LookupError::Unknown(other.to_string())),
        }
    }
}

/// A PokeAPI-shaped definition
pub fn definition(name: &str, order: i64) -> PokemonDefinition {
    serde_json::from_value(json!({
        "order": order,
        "name": name,
        "height": 4,
        "weight": 60,
        "abilities": [{ "ability": { "name": "static", "url": "" }, "is_hidden": false, "slot": 1 }],
        "types": [{ "slot": 1, "type": { "name": "electric", "url": "" } }],
        "stats": [{ "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } }],
        "sprites": { "front_default": format!("https://img.example/{}.png", name) }
    }))
    .expect("fixture definition should deserialize")
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.storage.backend = StorageBackend::Memory;
    cfg
}

/// A rocket client over a fresh in-memory bucket
pub fn test_client() -> Client {
    let rocket = build_rocket(&test_config(), StoreGateway::in_memory(), Box::new(StubLookup))
        .expect("Failed to build rocket");
    Client::tracked(rocket).expect("Failed to create client")
}

/// Test if rocket can be built
#[test]
fn test_rocket() {
    let _rocket = build_rocket(&test_config(), StoreGateway::in_memory(), Box::new(StubLookup))
        .expect("Failed to build rocket");
    // no panic = success
}
