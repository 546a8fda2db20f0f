//! Note Keeper
//!
//! A multi-user note service:
//! - Per-user notes with title, description and priority
//! - Ownership-checked update and delete
//! - JWT bearer authentication, deny-by-default
//! - In-memory or Neo4j storage
//! - HTTP client with an in-memory mirror of the user's notes

pub mod api;
pub mod auth;
pub mod client;
pub mod notes;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub store: StoreYamlConfig,
    /// Auth section. If absent (and no `JWT_SECRET`), every note request is denied
    pub auth: Option<AuthConfig>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Store configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreYamlConfig {
    pub backend: StoreBackend,
    pub neo4j: Neo4jYamlConfig,
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            neo4j: Neo4jYamlConfig::default(),
        }
    }
}

/// Neo4j connection settings, used when `backend: neo4j`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
        }
    }
}

/// Which note store the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Neo4j,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "neo4j" => Ok(StoreBackend::Neo4j),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret (should be >= 32 chars)
    pub jwt_secret: String,
    /// Lifetime of tokens minted by `note-keeper token`
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
}

fn default_jwt_expiry() -> u64 {
    28800 // 8 hours
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    /// Auth config. None means deny-by-default
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from environment variables and `config.yaml` in CWD.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        // 1. Load YAML config (or defaults if file not found)
        let yaml = Self::load_yaml(yaml_path);

        // 2. Build Config with env var overrides
        let store_backend = match std::env::var("NOTE_STORE") {
            Ok(value) => value
                .parse::<StoreBackend>()
                .map_err(anyhow::Error::msg)
                .context("Invalid NOTE_STORE")?,
            Err(_) => yaml.store.backend,
        };

        let auth_config = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Some(AuthConfig {
                jwt_secret: secret,
                jwt_expiry_secs: yaml
                    .auth
                    .as_ref()
                    .map(|a| a.jwt_expiry_secs)
                    .unwrap_or_else(default_jwt_expiry),
            }),
            _ => yaml.auth,
        };

        Ok(Self {
            server_host: yaml.server.host,
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            store_backend,
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.store.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.store.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD")
                .unwrap_or(yaml.store.neo4j.password),
            auth_config,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Application state
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn store::NoteStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with the configured store connected
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn store::NoteStore> = match config.store_backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory note store");
                Arc::new(store::MemoryNoteStore::new())
            }
            StoreBackend::Neo4j => Arc::new(
                store::Neo4jNoteStore::new(
                    &config.neo4j_uri,
                    &config.neo4j_user,
                    &config.neo4j_password,
                )
                .await?,
            ),
        };

        Ok(Self {
            store,
            config: Arc::new(config),
        })
    }

    /// Build the state the HTTP layer runs on
    pub fn server_state(&self) -> api::handlers::SharedState {
        let verifier = self.config.auth_config.as_ref().map(|auth| {
            Arc::new(auth::JwtVerifier::new(&auth.jwt_secret)) as Arc<dyn auth::IdentityVerifier>
        });

        if verifier.is_none() {
            tracing::warn!("No auth configured: every note request will be denied");
        }

        Arc::new(api::handlers::ServerState {
            notes: Arc::new(notes::NoteManager::new(self.store.clone())),
            verifier,
        })
    }
}

/// Run the HTTP server until Ctrl-C
pub async fn start_server(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let state = AppState::new(config).await?;
    let router = api::create_router(state.server_state());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Note Keeper listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")
}

// ============================================================================
// Tests
// ============================================================================
