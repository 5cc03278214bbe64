/// Trainer HTTP endpoints module
pub mod endpoints;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    pokemon::{PokemonDefinition, caught_entry, entry_id, next_pokemon_id},
    storage::{DOCUMENT_SUFFIX, DeleteResult, StoreError, StoreGateway, WriteResult},
};

/// A trainer's document exactly as stored
///
/// Only `pokemons` is looked at, and only when a Pokemon is caught or
/// released; everything else passes through untouched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct Trainer(Map<String, Value>);

impl Trainer {
    pub fn from_document(document: Map<String, Value>) -> Self {
        Trainer(document)
    }

    pub fn into_document(self) -> Map<String, Value> {
        self.0
    }

    /// Caught Pokemon in capture order, a missing or null list counts as empty
    pub fn pokemons(&self) -> TrainerResult<&[Value]> {
        match self.0.get("pokemons") {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => Err(TrainerError::NotAList),
        }
    }

    fn pokemons_mut(&mut self) -> TrainerResult<&mut Vec<Value>> {
        let pokemons = self
            .0
            .entry("pokemons")
            .or_insert_with(|| Value::Array(vec![]));
        if pokemons.is_null() {
            *pokemons = Value::Array(vec![]);
        }
        pokemons.as_array_mut().ok_or(TrainerError::NotAList)
    }

    /// Appends a freshly caught Pokemon and returns its id
    pub fn catch(&mut self, definition: PokemonDefinition) -> TrainerResult<u64> {
        let pokemons = self.pokemons_mut()?;
        let id = next_pokemon_id(pokemons);
        pokemons.push(caught_entry(id, definition));
        Ok(id)
    }

    /// Removes the Pokemon whose id prints as `pokemon_id`,
    /// returns whether anything was removed
    pub fn release(&mut self, pokemon_id: &str) -> TrainerResult<bool> {
        let index = self
            .pokemons()?
            .iter()
            .position(|entry| entry_id(entry).as_deref() == Some(pokemon_id));
        match index {
            Some(index) => {
                self.pokemons_mut()?.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Trainer document '{key}' could not be (de)serialized: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Trainer document has a 'pokemons' field that is not a list")]
    NotAList,
}

pub type TrainerResult<T> = Result<T, TrainerError>;

/// Object key of a trainer's document
pub fn trainer_key(name: &str) -> String {
    format!("{}{}", name, DOCUMENT_SUFFIX)
}

/// Fills in `name` and `pokemons` when the document lacks them,
/// every key present in `data` is kept as-is
pub fn with_defaults(data: Map<String, Value>) -> Map<String, Value> {
    let mut document = Map::new();
    document.insert("name".to_string(), Value::String(String::new()));
    document.insert("pokemons".to_string(), Value::Array(vec![]));
    document.extend(data);
    document
}

/// Trainer documents on top of the object store
#[derive(Clone)]
pub struct TrainerService {
    store: StoreGateway,
}

impl TrainerService {
    pub fn new(store: StoreGateway) -> Self {
        Self { store }
    }

    /// Names of all stored trainers, in listing order
    pub async fn list_trainer_names(&self) -> TrainerResult<Vec<String>> {
        let objects = self.store.list().await?;
        Ok(objects
            .into_iter()
            .map(|object| match object.key.strip_suffix(DOCUMENT_SUFFIX) {
                Some(name) => name.to_string(),
                None => object.key,
            })
            .collect())
    }

    /// Whether a document for `name` shows up in the listing
    pub async fn trainer_exists(&self, name: &str) -> TrainerResult<bool> {
        Ok(self.store.exists(&trainer_key(name)).await?)
    }

    /// Loads a trainer's document, fails with `StoreError::NotFound` if there is none
    pub async fn get_trainer(&self, name: &str) -> TrainerResult<Trainer> {
        let key = trainer_key(name);
        let text = self.store.get_text(&key).await?;
        serde_json::from_str(&text).map_err(|source| TrainerError::Json { key, source })
    }

    /// Stores `data` as the complete document of `name`, defaulted
    pub async fn upsert_trainer(
        &self,
        name: &str,
        data: Map<String, Value>,
    ) -> TrainerResult<WriteResult> {
        let key = trainer_key(name);
        let body = serde_json::to_vec(&with_defaults(data))
            .map_err(|source| TrainerError::Json { key: key.clone(), source })?;
        info!("Writing trainer document '{}'", key);
        Ok(self.store.put(&key, body).await?)
    }

    /// Stores a loaded and modified trainer as the complete document of `name`
    pub async fn save_trainer(&self, name: &str, trainer: Trainer) -> TrainerResult<WriteResult> {
        self.upsert_trainer(name, trainer.into_document()).await
    }

    pub async fn delete_trainer(&self, name: &str) -> TrainerResult<DeleteResult> {
        let key = trainer_key(name);
        info!("Deleting trainer document '{}'", key);
        Ok(self.store.delete(&key).await?)
    }
}
