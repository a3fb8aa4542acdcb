//! Configuration management for the GreatReading server

use serde::Deserialize;
use std::env;

/// Default timer length handed to new users, in minutes
pub const DEFAULT_TIMER_MINUTES: i64 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub definitions: DefinitionsConfig,
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub dev_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted PDF, in bytes
    pub max_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionsConfig {
    pub api_url: String,
    pub cache_capacity: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Owner of every book, dictionary word and settings row
    pub default_user_id: String,
    pub seed_sample_book: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec![
                    "http://localhost:8080".to_string(),
                    "http://localhost:3000".to_string(),
                ],
                dev_mode: false,
            },
            database: DatabaseConfig {
                url: "sqlite:./greatreading.db".to_string(),
            },
            upload: UploadConfig {
                max_size: 50 * 1024 * 1024,
            },
            definitions: DefinitionsConfig {
                api_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
                cache_capacity: 512,
                timeout_secs: 10,
            },
            library: LibraryConfig {
                default_user_id: "default-user".to_string(),
                seed_sample_book: true,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT")?.unwrap_or(defaults.server.port),
                cors_origins: env::var("BACKEND_CORS_ORIGINS")
                    .map(|origins| split_origins(&origins))
                    .unwrap_or(defaults.server.cors_origins),
                dev_mode: parse_var("DEV_MODE")?.unwrap_or(defaults.server.dev_mode),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            upload: UploadConfig {
                max_size: parse_var("MAX_UPLOAD_SIZE")?.unwrap_or(defaults.upload.max_size),
            },
            definitions: DefinitionsConfig {
                api_url: env::var("DICTIONARY_API_URL").unwrap_or(defaults.definitions.api_url),
                cache_capacity: parse_var("DEFINITION_CACHE_SIZE")?
                    .unwrap_or(defaults.definitions.cache_capacity),
                timeout_secs: parse_var("DICTIONARY_API_TIMEOUT")?
                    .unwrap_or(defaults.definitions.timeout_secs),
            },
            library: LibraryConfig {
                default_user_id: env::var("DEFAULT_USER_ID")
                    .unwrap_or(defaults.library.default_user_id),
                seed_sample_book: parse_var("SEED_SAMPLE_BOOK")?
                    .unwrap_or(defaults.library.seed_sample_book),
            },
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
