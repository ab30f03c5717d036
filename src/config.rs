use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Which document store backs the facade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

impl TryFrom<String> for StoreBackend {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", value)),
        }
    }
}

/// Connection record for one Firebase project.
///
/// Only `api_key`, `project_id`, `database_id`, `endpoint` and
/// `timeout_seconds` matter to the REST client; the remaining fields are
/// carried so the same record can be handed to a web page verbatim.
#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
    pub database_id: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl FirebaseConfig {
    /// Creates a configuration for a project with the default database and endpoint
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            api_key: api_key.into(),
            auth_domain: format!("{}.firebaseapp.com", project_id),
            storage_bucket: format!("{}.appspot.com", project_id),
            project_id,
            messaging_sender_id: None,
            app_id: None,
            measurement_id: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
            timeout_seconds: 30,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn from_env() -> Result<Self> {
        let project_id = env::var("FIREBASE_PROJECT_ID").unwrap_or_default();
        let api_key = env::var("FIREBASE_API_KEY").unwrap_or_default();

        let mut config = Self::new(project_id, api_key);
        if let Ok(auth_domain) = env::var("FIREBASE_AUTH_DOMAIN") {
            config.auth_domain = auth_domain;
        }
        if let Ok(bucket) = env::var("FIREBASE_STORAGE_BUCKET") {
            config.storage_bucket = bucket;
        }
        config.messaging_sender_id = env::var("FIREBASE_MESSAGING_SENDER_ID").ok();
        config.app_id = env::var("FIREBASE_APP_ID").ok();
        config.measurement_id = env::var("FIREBASE_MEASUREMENT_ID").ok();
        config.database_id = env::var("FIRESTORE_DATABASE_ID")
            .unwrap_or_else(|_| DEFAULT_DATABASE_ID.to_string());
        config.endpoint = env::var("FIRESTORE_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_FIRESTORE_ENDPOINT.to_string());
        config.timeout_seconds = env::var("FIRESTORE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("Firebase API key cannot be empty"));
        }

        if self.project_id.trim().is_empty() {
            return Err(anyhow!("Firebase project ID cannot be empty"));
        }

        if self.database_id.trim().is_empty() {
            return Err(anyhow!("Firestore database ID cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(anyhow!("Firestore endpoint must start with http:// or https://"));
        }

        Ok(())
    }

    /// Resource name of the database's document root, relative to the endpoint
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    /// Absolute URL of the database's document root
    pub fn documents_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.documents_root())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub static_dir: String,
    pub store_backend: StoreBackend,
    pub firebase: FirebaseConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend = StoreBackend::try_from(
            env::var("HUNTDB_STORE").unwrap_or_else(|_| "firestore".to_string()),
        )
        .map_err(|e| anyhow!(e))?;

        let firebase = FirebaseConfig::from_env()?;
        if store_backend == StoreBackend::Firestore {
            firebase.validate()?;
        }

        Ok(Config {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            store_backend,
            firebase,
        })
    }
}
