//! TOML-driven client configuration.
//!
//! A config file is optional: every field has a default, and a partial file
//! only overrides what it names.
//!
//! ```toml
//! api_base_url = "http://ops.internal:8000"
//! verification_owner = "FieldOps"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use gridops_contracts::error::{GridOpsError, GridOpsResult};
use gridops_core::actions::DEFAULT_TEAM;

/// Backend base URL used when no config file or flag overrides it.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Configuration for the dashboard's backend connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the triage backend, without a trailing path.
    pub api_base_url: String,
    /// Owner label written onto locally synthesized verification tasks.
    pub verification_owner: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            verification_owner: DEFAULT_TEAM.to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse `s` as a TOML client configuration.
    ///
    /// Returns `GridOpsError::Config` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> GridOpsResult<Self> {
        toml::from_str(s).map_err(|e| GridOpsError::Config {
            reason: format!("failed to parse client config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML client configuration.
    pub fn from_file(path: &Path) -> GridOpsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GridOpsError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
