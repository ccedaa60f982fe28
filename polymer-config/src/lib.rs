// Configuration management for Polymer clients

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::ClientSettings;
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Environment prefix used when none is given.
pub const DEFAULT_ENV_PREFIX: &str = "POLYMER";

/// Layered configuration store. Later loads override earlier ones.
#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<Map<String, Value>>>,
    env_prefix: String,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(Map::new())),
            env_prefix: prefix.into(),
        }
    }

    /// Load `PREFIX_*` environment variables.
    ///
    /// Values that read as JSON numbers or booleans are stored typed so that
    /// `POLYMER_TIMEOUT_SECS=5` deserializes into a `u64` field.
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(Some(self.env_prefix.clone()));
        let mut config = self.config.write();
        for (key, value) in loader.load() {
            config.insert(key, coerce_env_value(value));
        }
        Ok(())
    }

    /// Load a `.env` file into the process environment, then `load_env`.
    pub fn load_dotenv(&self, path: Option<&str>) -> Result<()> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            // A missing default .env is not an error.
            dotenvy::dotenv().ok();
        }
        self.load_env()
    }

    pub fn load_file(&self, path: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).load_file(path)?;
        self.merge_value(data)
    }

    /// Merge the top-level keys of a JSON object.
    pub fn merge_value(&self, data: Value) -> Result<()> {
        let Value::Object(map) = data else {
            return Err(ConfigError::ParseError(
                "configuration root must be an object".to_string(),
            ));
        };
        let mut config = self.config.write();
        for (key, value) in map {
            config.insert(key, value);
        }
        Ok(())
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        self.config.write().insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let config = self.config.read();
        let value = config
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.config.read().contains_key(key)
    }

    /// Deserialize the whole store and validate it.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let json_value = Value::Object(self.config.read().clone());

        let validated: T = serde_json::from_value(json_value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        validated.validate()?;

        Ok(validated)
    }

    /// Shorthand for `load_validated::<ClientSettings>()`.
    pub fn client_settings(&self) -> Result<ClientSettings> {
        self.load_validated()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn coerce_env_value(raw: String) -> Value {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw),
    }
}
