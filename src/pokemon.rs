/// PokeAPI HTTP client
pub mod lookup;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The sprite images of a Pokemon, only the default front image is kept
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Sprites {
    pub front_default: Option<String>,
}

/// The descriptive attributes of a Pokemon as served by the lookup API
///
/// `abilities`, `types` and `stats` are kept as raw JSON so they can be
/// copied into a trainer's document without loss.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PokemonDefinition {
    pub order: i64,
    pub name: String,
    pub height: i64,
    pub weight: i64,
    pub abilities: Value,
    pub types: Value,
    pub stats: Value,
    pub sprites: Sprites,
}

/// The entry stored for a freshly caught Pokemon: a snapshot of its
/// definition, an id and an empty nickname
pub fn caught_entry(id: u64, definition: PokemonDefinition) -> Value {
    json!({
        "id": id,
        "nickname": "",
        "order": definition.order,
        "name": definition.name,
        "height": definition.height,
        "weight": definition.weight,
        "abilities": definition.abilities,
        "types": definition.types,
        "stats": definition.stats,
        "sprites": { "front_default": definition.sprites.front_default },
    })
}

/// The id of an entry the way it prints in a URL, entries without a
/// number or string id have none
pub fn entry_id(entry: &Value) -> Option<String> {
    match &entry["id"] {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// The id the next caught Pokemon gets: one above the highest id in use, or 1
pub fn next_pokemon_id(entries: &[Value]) -> u64 {
    entries
        .iter()
        .filter_map(|entry| entry["id"].as_u64())
        .max()
        .unwrap_or(0)
        + 1
}
