use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::resolver::KnownIdentifierSet;

/// HTTP parameters for menu document requests (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for establishing the connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole request, body included.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/menu/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Deployment base; menu documents live under `<base_url>menus/<id>.json`.
    pub base_url: String,
    /// Query parameter carrying the menu identifier.
    pub query_param: String,
    /// Identifiers for which a menu document is expected to exist.
    #[serde(default)]
    pub known_menus: Vec<String>,
    /// Appended to the restaurant name when the page title is updated.
    pub title_suffix: String,
    /// Optional request tuning; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173/lightweight-menu/".to_string(),
            query_param: "menu".to_string(),
            known_menus: Vec::new(),
            title_suffix: "Menu".to_string(),
            fetch: None,
        }
    }
}

impl MenuConfig {
    pub fn known_set(&self) -> KnownIdentifierSet {
        KnownIdentifierSet::new(self.known_menus.iter().cloned())
    }

    pub fn fetch_or_default(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }

    /// Parsed deployment base. A missing trailing slash is added so that
    /// relative joins stay under the base path.
    pub fn base(&self) -> Result<url::Url> {
        let mut base = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url in config: {}", self.base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("menu")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MenuConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MenuConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MenuConfig =
        toml::from_str(&data).with_context(|| format!("invalid config at {}", path.display()))?;
    Ok(cfg)
}
