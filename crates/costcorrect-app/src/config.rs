//! Configuration management for costcorrect
//!
//! Config stored at: ~/.config/costcorrect/config.json
//! (`COSTCORRECT_CONFIG_DIR` overrides the directory).

use costcorrect_domain::BrickConstants;
use costcorrect_types::{ConfigError, OutputFormat, Result, Tier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_DIR_ENV: &str = "COSTCORRECT_CONFIG_DIR";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vision backend to use
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Model name override (optional)
    #[serde(default)]
    pub model: Option<String>,

    /// Vision API key. `GOOGLE_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable caching of vision results
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache directory override
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Subscription tier used for the access gate
    #[serde(default)]
    pub tier: Tier,

    /// TOML file replacing the embedded constants
    #[serde(default)]
    pub constants_file: Option<PathBuf>,

    /// Brick constants
    #[serde(default)]
    pub constants: BrickConstants,
}

fn default_backend() -> String {
    "gemini".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: None,
            api_key: None,
            cache_enabled: true,
            cache_dir: None,
            output_format: OutputFormat::default(),
            tier: Tier::default(),
            constants_file: None,
            constants: BrickConstants::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("costcorrect");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or(ConfigError::NotFound)?
            .join("costcorrect");
        Ok(cache_dir)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// API key, preferring the environment over the stored value
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|k| std::env::var(k).ok())
    }

    fn api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    /// Effective brick constants: embedded, or the TOML file when set,
    /// then `COSTCORRECT_*` environment overrides, then validation.
    pub fn resolve_constants(&self) -> Result<BrickConstants> {
        self.resolve_constants_with(|k| std::env::var(k).ok())
    }

    pub fn resolve_constants_with<F>(&self, lookup: F) -> Result<BrickConstants>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut constants = match self.constants_file {
            Some(ref path) => BrickConstants::load_from_file(path)?,
            None => self.constants.clone(),
        };

        let applied = constants.apply_env_overrides(lookup)?;
        if !applied.is_empty() {
            debug!(fields = ?applied, "constants overridden from environment");
        }

        constants.validate()?;
        Ok(constants)
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CostCorrect Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "Backend:        {}", self.backend)?;
        writeln!(
            f,
            "Model:          {}",
            self.model.as_deref().unwrap_or("(default)")
        )?;
        writeln!(
            f,
            "API key:        {}",
            if self.api_key().is_some() { "(set)" } else { "(not set)" }
        )?;
        writeln!(f, "Cache enabled:  {}", self.cache_enabled)?;
        writeln!(
            f,
            "Cache dir:      {}",
            self.cache_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f, "Tier:           {}", self.tier)?;
        writeln!(
            f,
            "Constants file: {}",
            self.constants_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(embedded)".to_string())
        )?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
