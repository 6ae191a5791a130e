use crate::ConfigError;
use std::env;
use std::fmt;

/// Connection string of the document store (SQLite database path)
pub const DOCUMENT_STORE_KEY: &str = "DOCUMENT_STORE_KEY";

/// API key for the AI text-refinement service
pub const AI_SERVICE_KEY: &str = "AI_SERVICE_KEY";

/// Secret values supplied through the environment
///
/// Neither value is required up front; the pipeline asks for the ones the
/// selected mode actually needs.
#[derive(Clone, Default)]
pub struct Secrets {
    pub document_store: Option<String>,
    pub ai_service: Option<String>,
}

impl Secrets {
    /// Loads `.env` (if present) and reads the secrets from the environment
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to read .env file: {}", e);
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds secrets from an arbitrary key lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            document_store: read(DOCUMENT_STORE_KEY),
            ai_service: read(AI_SERVICE_KEY),
        }
    }

    pub fn require_document_store(&self) -> Result<&str, ConfigError> {
        self.document_store
            .as_deref()
            .ok_or(ConfigError::MissingSecret(DOCUMENT_STORE_KEY))
    }

    pub fn require_ai_service(&self) -> Result<&str, ConfigError> {
        self.ai_service
            .as_deref()
            .ok_or(ConfigError::MissingSecret(AI_SERVICE_KEY))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("document_store", &mask(&self.document_store))
            .field("ai_service", &mask(&self.ai_service))
            .finish()
    }
}
