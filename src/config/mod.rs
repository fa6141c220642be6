use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, Result};

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CHARS: usize = 5000;

const HEADER: &str = "# grammar-fixer configuration file.\n\
# [spelling] dictionary = \"/path/to/frequency.txt\" enables spelling correction.\n\n";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,
    pub language: String,
    pub grammar: GrammarConfig,
    pub spelling: SpellingConfig,
    pub web: WebConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Base URL of the LanguageTool server.
    pub server_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    /// Word frequency file; spelling correction is off without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    /// Longest accepted request text, in characters.
    pub max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: Self::default_path(),
            language: DEFAULT_LANGUAGE.to_string(),
            grammar: GrammarConfig::default(),
            spelling: SpellingConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("grammar-fixer")
            .join("config.toml")
    }

    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. The default location is created with a
    /// commented default file on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(AppError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            return Self::from_file(path);
        }

        let default_path = Self::default_path();
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }

        let config = Config::default();
        match config.save() {
            Ok(()) => info!("📝 Wrote default configuration to {}", default_path.display()),
            Err(e) => warn!("⚠️ Could not write default configuration: {}", e),
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml_edit::de::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let doc = toml_edit::ser::to_document(self)
            .map_err(|e| AppError::Config(format!("cannot serialize configuration: {}", e)))?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.config_path, format!("{}{}", HEADER, doc))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(AppError::Config("language must not be empty".to_string()));
        }
        if self.grammar.server_url.trim().is_empty() {
            return Err(AppError::Config(
                "grammar.server_url must point at a LanguageTool server".to_string(),
            ));
        }
        Url::parse(&self.grammar.server_url).map_err(|e| {
            AppError::Config(format!(
                "grammar.server_url '{}' is not a valid URL: {}",
                self.grammar.server_url, e
            ))
        })?;
        if self.web.max_chars == 0 {
            return Err(AppError::Config("web.max_chars must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.config_path.to_string_lossy().contains("config.toml"));
        assert_eq!(config.language, "en-US");
        assert_eq!(config.grammar.server_url, "http://localhost:8081");
        assert_eq!(config.web.max_chars, 5000);
        assert!(config.spelling.dictionary.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.config_path = config_path.clone();
        config.language = "de-DE".to_string();
        config.spelling.dictionary = Some(PathBuf::from("/usr/share/words.txt"));

        config.save().unwrap();
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[grammar]\nserver_url = \"https://lt.example.org\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.grammar.server_url, "https://lt.example.org");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.web.bind, "127.0.0.1:5000");
    }

    #[test]
    fn test_explicit_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(AppError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "language = [unterminated").unwrap();
        assert!(matches!(Config::from_file(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.grammar.server_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.language = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.web.max_chars = 0;
        assert!(config.validate().is_err());
    }
}
