use async_trait::async_trait;
use log::info;
use std::time::Duration;
use thiserror::Error;

use super::PokemonDefinition;
use crate::config::PokeApiConfig;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Pokemon lookup for '{name}' failed: {source}")]
    Request {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Pokemon '{0}' is not known to the lookup service")]
    Unknown(String),
}

/// Source of canonical Pokemon definitions
#[async_trait]
pub trait PokemonLookup: Send + Sync {
    async fn find_pokemon(&self, name: &str) -> Result<PokemonDefinition, LookupError>;
}

/// Looks Pokemon up on PokeAPI
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(cfg: &PokeApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The URL of the definition of `name`
    pub fn definition_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }
}

#[async_trait]
impl PokemonLookup for PokeApiClient {
    async fn find_pokemon(&self, name: &str) -> Result<PokemonDefinition, LookupError> {
        let url = self.definition_url(name);
        info!("Looking up {}", url);

        let request_error = |source| LookupError::Request {
            name: name.to_string(),
            source,
        };

        let response = self.http.get(&url).send().await.map_err(request_error)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::Unknown(name.to_string()));
        }

        response
            .error_for_status()
            .map_err(request_error)?
            .json::<PokemonDefinition>()
            .await
            .map_err(request_error)
    }
}
