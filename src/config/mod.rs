use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub favorites: Option<FavoritesConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(rename = "apikey")]
    pub api_key: Option<String>,
    #[serde(rename = "baseUrl", default = "default_base_url")]
    pub base_url: String,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FavoritesConfig {
    pub path: PathBuf,
}

impl Configuration {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Configuration = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Reads `path` if it exists, otherwise starts from defaults. The
    /// `OMDB_API_KEY` environment variable wins over the file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.omdb.api_key = Some(key);
        }
    }

    pub fn favorites_path(&self) -> Option<&Path> {
        self.favorites.as_ref().map(|f| f.path.as_path())
    }
}

impl HttpConfig {
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("moviescout/{}", env!("CARGO_PKG_VERSION")))
    }

    /// No timeout unless one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
