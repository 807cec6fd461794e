use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use xmlweather_core::{LoaderConfig, Units};

/// User defaults stored on disk. Every field is optional; command-line flags
/// win over whatever is set here.
///
/// Example TOML:
/// language = "pl"
/// units = "fahrenheit"
/// timeout_secs = 5
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub language: Option<String>,
    pub units: Option<Units>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from the platform config directory, or defaults if there is none.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "xmlweather", "xmlweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loader settings: built-in defaults overlaid with whatever this file sets.
    pub fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig::default();

        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(language) = &self.language {
            config = config.with_language(language.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
    }

    pub fn units(&self) -> Units {
        self.units.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.loader_config(), LoaderConfig::default());
        assert_eq!(cfg.units(), Units::Celsius);
    }

    #[test]
    fn file_values_override_loader_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "language = \"pl\"\nunits = \"fahrenheit\"\nendpoint = \"http://feed\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        let loader = cfg.loader_config();

        assert_eq!(loader.language, "pl");
        assert_eq!(loader.endpoint, "http://feed");
        assert_eq!(loader.timeout, Duration::from_secs(3));
        assert_eq!(cfg.units(), Units::Fahrenheit);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::parse("timeout_secs = 30").unwrap();
        let loader = cfg.loader_config();

        assert_eq!(loader.language, "en");
        assert_eq!(loader.timeout, Duration::from_secs(30));
    }

    #[test]
    fn units_accept_same_spellings_as_flag() {
        assert_eq!(Config::parse("units = \"f\"").unwrap().units(), Units::Fahrenheit);
        assert_eq!(Config::parse("units = \"C\"").unwrap().units(), Units::Celsius);
        assert_eq!(Config::parse("units = \"Fahrenheit\"").unwrap().units(), Units::Fahrenheit);
        assert!(Config::parse("units = \"kelvin\"").is_err());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
