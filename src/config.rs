use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::content::{Platform, Tone};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const ENDPOINT_ENV: &str = "NEWSGEN_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub default_tone: Option<Tone>,
    pub default_platform: Option<Platform>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            default_tone: None,
            default_platform: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Pick the endpoint: command-line flag, then environment, then file.
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        self.endpoint_from(flag, std::env::var(ENDPOINT_ENV).ok())
    }

    fn endpoint_from(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env.filter(|v| !v.trim().is_empty()))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn tone(&self) -> Tone {
        self.default_tone.unwrap_or_default()
    }

    pub fn platform(&self) -> Platform {
        self.default_platform.unwrap_or_default()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("newsgen").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.tone(), Tone::Humorous);
        assert_eq!(config.platform(), Platform::Twitter);
    }

    #[test]
    fn saves_and_reloads_preferences() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            endpoint: Some("http://gen.local:9000".to_string()),
            default_tone: Some(Tone::Formal),
            default_platform: Some(Platform::Linkedin),
        };
        config.save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"formal\""));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn endpoint_precedence() {
        let config = Config {
            endpoint: Some("http://file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_from(Some("http://flag"), Some("http://env".to_string())),
            "http://flag"
        );
        assert_eq!(config.endpoint_from(None, Some("http://env".to_string())), "http://env");
        assert_eq!(config.endpoint_from(None, Some("  ".to_string())), "http://file");
        assert_eq!(Config::default().endpoint_from(None, None), DEFAULT_ENDPOINT);
    }
}
