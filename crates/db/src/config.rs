use std::sync::Arc;
use std::time::Duration;

use crate::store::pg::{create_pool, PgStore};
use crate::store::{MemoryStore, RemoteStore, RestStore, StoreError};

/// Which [`RemoteStore`] implementation to connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Rest,
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rest" => Some(StoreBackend::Rest),
            "postgres" | "pg" => Some(StoreBackend::Postgres),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the hosted project, e.g. `https://abc.example.co`.
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// PostgREST mount path under `url` (default: `/rest/v1`).
    pub rest_path: String,
    pub timeout_secs: u64,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `STORE_BACKEND`      | `rest`     |
    /// | `STORE_URL`          | (required for `rest`) |
    /// | `STORE_API_KEY`      | (required for `rest`) |
    /// | `STORE_REST_PATH`    | `/rest/v1` |
    /// | `STORE_TIMEOUT_SECS` | `30`       |
    /// | `DATABASE_URL`       | (required for `postgres`) |
    /// | `DB_MAX_CONNECTIONS` | `20`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match var("STORE_BACKEND") {
            Some(value) => StoreBackend::parse(&value).ok_or(ConfigError::Invalid {
                var: "STORE_BACKEND",
                value,
            })?,
            None => StoreBackend::Rest,
        };

        let timeout_secs = parse_or(var("STORE_TIMEOUT_SECS"), "STORE_TIMEOUT_SECS", 30)?;
        let max_connections = parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 20)?;

        let config = Self {
            backend,
            url: var("STORE_URL"),
            api_key: var("STORE_API_KEY"),
            rest_path: var("STORE_REST_PATH").unwrap_or_else(|| "/rest/v1".into()),
            timeout_secs,
            database_url: var("DATABASE_URL"),
            max_connections,
        };

        match config.backend {
            StoreBackend::Rest if config.url.is_none() => Err(ConfigError::Missing("STORE_URL")),
            StoreBackend::Rest if config.api_key.is_none() => {
                Err(ConfigError::Missing("STORE_API_KEY"))
            }
            StoreBackend::Postgres if config.database_url.is_none() => {
                Err(ConfigError::Missing("DATABASE_URL"))
            }
            _ => Ok(config),
        }
    }

    /// Full REST root: `url` joined with `rest_path`.
    pub fn rest_url(&self) -> String {
        let base = self.url.as_deref().unwrap_or_default().trim_end_matches('/');
        let path = self.rest_path.trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Build the configured store.
    pub async fn connect(&self) -> Result<Arc<dyn RemoteStore>, StoreError> {
        let store: Arc<dyn RemoteStore> = match self.backend {
            StoreBackend::Rest => Arc::new(RestStore::new(
                self.rest_url(),
                self.api_key.clone().unwrap_or_default(),
                Duration::from_secs(self.timeout_secs),
            )?),
            StoreBackend::Postgres => {
                let url = self.database_url.as_deref().unwrap_or_default();
                Arc::new(PgStore::new(create_pool(url, self.max_connections).await?))
            }
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        tracing::info!(backend = store.backend(), "Store connected");
        Ok(store)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<StoreConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StoreConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn rest_is_default_and_needs_url_and_key() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("STORE_URL"));
        assert_eq!(
            load(&[("STORE_URL", "https://abc.example.co")]).unwrap_err(),
            ConfigError::Missing("STORE_API_KEY")
        );

        let config = load(&[
            ("STORE_URL", "https://abc.example.co/"),
            ("STORE_API_KEY", "anon"),
        ])
        .unwrap();
        assert_eq!(config.backend, StoreBackend::Rest);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.rest_url(), "https://abc.example.co/rest/v1");
    }

    #[test]
    fn postgres_needs_database_url() {
        assert_eq!(
            load(&[("STORE_BACKEND", "postgres")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        let config = load(&[
            ("STORE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/madrasa"),
            ("DB_MAX_CONNECTIONS", "5"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn memory_needs_nothing() {
        let config = load(&[("STORE_BACKEND", "Memory")]).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            load(&[("STORE_BACKEND", "sqlite")]).unwrap_err(),
            ConfigError::Invalid {
                var: "STORE_BACKEND",
                value: "sqlite".into()
            }
        );
        assert!(matches!(
            load(&[("STORE_BACKEND", "memory"), ("STORE_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid { var: "STORE_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn empty_rest_path_uses_bare_url() {
        let config = load(&[
            ("STORE_URL", "http://localhost:3000"),
            ("STORE_API_KEY", "k"),
            ("STORE_REST_PATH", "/"),
        ])
        .unwrap();
        assert_eq!(config.rest_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn memory_backend_connects() {
        let config = load(&[("STORE_BACKEND", "memory")]).unwrap();
        let store = config.connect().await.unwrap();
        assert_eq!(store.backend(), "memory");
    }
}
