use anyhow::{Result, bail};
use serde::Deserialize;
use std::{env, fs, path::Path};

/// Default location of the configuration file, relative to the working directory
pub const CONFIG_PATH: &str = "config.toml";

/// Which object store implementation backs the trainer documents
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Amazon S3 (or any S3 compatible service)
    #[default]
    S3,
    /// Process-local store, contents are lost on exit
    Memory,
}

/// Object store settings
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Name of the bucket holding one `<trainer>.json` object per trainer
    pub bucket_name: Option<String>,
    pub region: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket_name: None,
            region: "us-east-1".to_string(),
        }
    }
}

/// HTTP server settings
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// The only origin allowed by the CORS fairing
    pub frontend_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            frontend_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// PokeAPI client settings
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PokeApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pokeapi.co/api/v2".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Process configuration, built once at startup and handed to the
/// storage gateway, the lookup client and the rocket instance
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub pokeapi: PokeApiConfig,
}

impl Config {
    /// Parses configuration from TOML text, missing keys take their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path` if it exists, then applies environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut cfg = if path.exists() {
            Self::from_toml(&fs::read_to_string(path)?)?
        } else {
            Self::default()
        };

        cfg.apply_overrides(|key| env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies overrides looked up by variable name
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bucket) = lookup("BUCKET_NAME") {
            self.storage.bucket_name = Some(bucket);
        }
        if let Some(region) = lookup("REGION") {
            self.storage.region = region;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = match backend.to_ascii_lowercase().as_str() {
                "s3" => StorageBackend::S3,
                "memory" => StorageBackend::Memory,
                other => bail!("Unknown storage backend '{}'", other),
            };
        }
        if let Some(origin) = lookup("FRONTEND_ORIGIN") {
            self.server.frontend_origin = origin;
        }
        if let Some(port) = lookup("BACKEND_PORT") {
            self.server.port = port.parse()?;
        }
        if let Some(url) = lookup("POKEAPI_URL") {
            self.pokeapi.base_url = url;
        }
        Ok(())
    }

    /// Checks that the selected backend has everything it needs
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::S3
            && self
                .storage
                .bucket_name
                .as_deref()
                .is_none_or(str::is_empty)
        {
            bail!("No bucket name configured for the s3 storage backend");
        }
        Ok(())
    }
}
