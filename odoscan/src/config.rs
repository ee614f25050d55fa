use std::fmt;
use std::path::{Path, PathBuf};

use odo_core::error::{OdoError, Result};
use odo_core::repo::DEFAULT_HISTORY_FILE;
use odo_core::vision::Provider;
use serde::Deserialize;

/// Files probed when no `--config` is given, first match wins.
/// `.streamlit/secrets.toml` keeps older `GEMINI_API_KEY` secrets working.
const DEFAULT_CONFIG_FILES: &[&str] = &["odoscan.toml", ".streamlit/secrets.toml"];

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    #[serde(rename = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,
    #[serde(rename = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,
    pub history_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Resolved runtime configuration.
#[derive(Clone)]
pub struct Config {
    pub provider: Provider,
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub history_file: PathBuf,
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("history_file", &self.history_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Defaults, then the TOML file, then `.env` and process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(p) => read_file_config(p)?,
            None => match DEFAULT_CONFIG_FILES.iter().map(Path::new).find(|p| p.is_file()) {
                Some(p) => read_file_config(p)?,
                None => FileConfig::default(),
            },
        };
        let _ = dotenvy::dotenv();
        Self::from_sources(file, |k| std::env::var(k).ok())
    }

    pub fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |k: &str| env(k).filter(|v| !v.trim().is_empty());

        let provider = match lookup("ODOSCAN_PROVIDER").or(file.provider) {
            Some(p) => p.parse()?,
            None => Provider::Gemini,
        };
        let (key_var, file_key) = match provider {
            Provider::Gemini => ("GEMINI_API_KEY", file.gemini_api_key),
            Provider::OpenAi => ("OPENAI_API_KEY", file.openai_api_key),
        };
        let api_key = lookup(key_var)
            .or(file.api_key)
            .or(file_key)
            .filter(|k| !k.trim().is_empty());

        Ok(Self {
            provider,
            model: lookup("ODOSCAN_MODEL")
                .or(file.model)
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_base: lookup("ODOSCAN_API_BASE")
                .or(file.api_base)
                .unwrap_or_else(|| provider.default_api_base().to_string()),
            api_key,
            history_file: lookup("ODOSCAN_HISTORY_FILE")
                .map(PathBuf::from)
                .or(file.history_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
            log_level: lookup("RUST_LOG")
                .or(file.log_level)
                .unwrap_or_else(|| "warn".to_string()),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            let var = match self.provider {
                Provider::Gemini => "GEMINI_API_KEY",
                Provider::OpenAi => "OPENAI_API_KEY",
            };
            OdoError::Config(format!("{} API key not found; set {var}", self.provider))
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| OdoError::Config(format!("{}: {e}", path.display())))?;
    toml::from_str(&text).map_err(|e| OdoError::Config(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let cfg = Config::from_sources(FileConfig::default(), env_of(&[])).unwrap();
        assert_eq!(cfg.provider, Provider::Gemini);
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.history_file, PathBuf::from("odometer_history.csv"));
        assert_eq!(cfg.log_level, "warn");
        assert!(matches!(cfg.require_api_key(), Err(OdoError::Config(_))));
    }

    #[test]
    fn reads_streamlit_style_secret() {
        let file: FileConfig = toml::from_str("GEMINI_API_KEY = \"abc123\"\n").unwrap();
        let cfg = Config::from_sources(file, env_of(&[])).unwrap();
        assert_eq!(cfg.require_api_key().unwrap(), "abc123");
    }

    #[test]
    fn environment_overrides_file() {
        let file: FileConfig = toml::from_str(
            "provider = \"gemini\"\napi_key = \"from-file\"\nhistory_file = \"a.csv\"\n",
        )
        .unwrap();
        let cfg = Config::from_sources(
            file,
            env_of(&[
                ("GEMINI_API_KEY", "from-env"),
                ("ODOSCAN_HISTORY_FILE", "b.csv"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.history_file, PathBuf::from("b.csv"));
    }

    #[test]
    fn provider_switch_changes_defaults() {
        let cfg = Config::from_sources(
            FileConfig::default(),
            env_of(&[("ODOSCAN_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk-1")]),
        )
        .unwrap();
        assert_eq!(cfg.provider, Provider::OpenAi);
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.api_base, "https://api.openai.com");
        assert_eq!(cfg.require_api_key().unwrap(), "sk-1");
    }

    #[test]
    fn blank_values_are_ignored() {
        let cfg = Config::from_sources(
            FileConfig::default(),
            env_of(&[("GEMINI_API_KEY", "  "), ("ODOSCAN_MODEL", "")]),
        )
        .unwrap();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.model, "gemini-2.5-flash");
    }

    #[test]
    fn debug_masks_key() {
        let cfg = Config::from_sources(
            FileConfig::default(),
            env_of(&[("GEMINI_API_KEY", "super-secret")]),
        )
        .unwrap();
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }

    #[test]
    fn explicit_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Config::load(Some(&missing)), Err(OdoError::Config(_))));
    }

    #[test]
    fn unknown_provider_rejected() {
        let file: FileConfig = toml::from_str("provider = \"bard\"\n").unwrap();
        assert!(matches!(
            Config::from_sources(file, env_of(&[])),
            Err(OdoError::Config(_))
        ));
    }
}
