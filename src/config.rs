use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Result, TaggerError};

pub const DEFAULT_BASE_URL: &str = "https://data.bioontology.org";
pub const ENV_API_KEY: &str = "BIOPORTAL_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub bioportal: BioPortalConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioPortalConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Extra query parameters sent with every annotator request,
    /// e.g. `include = "prefLabel"`.
    #[serde(default)]
    pub annotator_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub downloads_dir: PathBuf,
}

impl Default for BioPortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            annotator_params: BTreeMap::new(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `ontotag` config file
    /// and `ONTOTAG_` environment variables (`__` separates nested keys).
    pub fn load() -> Result<Self> {
        Self::load_from(config::Environment::with_prefix("ONTOTAG"))
    }

    fn load_from(environment: config::Environment) -> Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("ontotag").required(false));

        config = config.add_source(
            environment
                .prefix_separator("_")
                .separator("__"),
        );

        let app_config: AppConfig = config.build()?.try_deserialize()?;
        Ok(app_config)
    }

    /// Resolve the BioPortal credential: configured key first, then the
    /// `BIOPORTAL_API_KEY` environment variable.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = self.bioportal.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match std::env::var(ENV_API_KEY) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(TaggerError::CredentialMissing {
                env_var: ENV_API_KEY.to_string(),
            }),
        }
    }
}
