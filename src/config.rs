use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Run settings. Layered from built-in defaults, an optional `catalog.toml`
/// and `CATALOG_*` environment variables, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub list_path: String,
    pub detail_path: String,
    pub default_term: String,
    pub concurrency: usize,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    /// Total tries per page; 1 disables retrying.
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://academica.psi.uba.ar".to_string(),
            list_path: "/Psi/Ope154_.php".to_string(),
            detail_path: "/Psi/Ver154_.php".to_string(),
            default_term: "2025-2".to_string(),
            concurrency: 4,
            output_dir: PathBuf::from("."),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            request_timeout_seconds: 25,
            max_attempts: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = ::config::Config::try_from(&Config::default())
            .context("Failed to build default configuration")?;

        let settings = ::config::Config::builder()
            .add_source(defaults)
            .add_source(::config::File::with_name("catalog").required(false))
            .add_source(::config::Environment::with_prefix("CATALOG").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn list_url(&self) -> Result<Url> {
        self.resolve(&self.list_path)
    }

    pub fn detail_url(&self, chair_id: u32) -> Result<Url> {
        let mut url = self.resolve(&self.detail_path)?;
        url.query_pairs_mut()
            .append_pair("catedra", &chair_id.to_string());
        Ok(url)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .with_context(|| format!("Invalid catalog URL {}{}", self.base_url, path))
    }
}
