use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::services::catalogue::CatalogueConfig;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
    /// Seconds a cached list stays fresh.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Pause between consecutive curated lookups.
    #[serde(default = "default_request_pause_ms")]
    pub request_pause_ms: u64,
    #[serde(default = "default_curated_titles")]
    pub curated_titles: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: hondana_home().join("config.yml"),
            provider_url: default_provider_url(),
            cache_path: default_cache_path(),
            cache_ttl: default_cache_ttl(),
            request_timeout: default_request_timeout(),
            request_pause_ms: default_request_pause_ms(),
            curated_titles: default_curated_titles(),
        }
    }
}

fn hondana_home() -> PathBuf {
    match std::env::var("HONDANA_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir().expect("should have home").join(".hondana"),
    }
}

fn default_provider_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_cache_path() -> String {
    let path = hondana_home().join("cache");
    if !path.exists() {
        let _ = std::fs::create_dir_all(&path);
    }
    path.display().to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    15
}

fn default_request_pause_ms() -> u64 {
    1000
}

fn default_curated_titles() -> Vec<String> {
    [
        "Solo Leveling",
        "Tower of God",
        "The God of High School",
        "Noblesse",
        "Sweet Home",
        "Bastard",
        "The Breaker",
        "The Gamer",
        "Hardcore Leveling Warrior",
        "Lookism",
        "Eleceed",
        "Omniscient Reader's Viewpoint",
        "True Beauty",
        "UnOrdinary",
        "Gosu",
        "Nano Machine",
        "Weak Hero",
        "The Beginning After the End",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => hondana_home().join("config.yml"),
        };

        match std::fs::File::open(config_path.clone()) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    pub fn catalogue(&self) -> CatalogueConfig {
        CatalogueConfig {
            cache_ttl: Duration::from_secs(self.cache_ttl),
            request_pause: Duration::from_millis(self.request_pause_ms),
            ..CatalogueConfig::default()
        }
    }
}
