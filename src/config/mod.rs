use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Theme;
use crate::infrastructure::ProviderConfig;

/// Where appointments come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Demo,
    Http,
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceKind,

    /// Base URL for the `http` source
    #[serde(default)]
    pub url: Option<String>,

    /// Database file for the `sqlite` source
    #[serde(default)]
    pub db_path: Option<String>,

    /// Insert demo rows into an empty sqlite database
    #[serde(default)]
    pub seed: bool,

    /// Write status changes back to the source
    #[serde(default)]
    pub persist_status: bool,

    #[serde(default)]
    pub theme: Theme,
}

impl Config {
    /// Provider for the configured source, or an error naming what is missing
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        match self.source {
            SourceKind::Demo => Ok(ProviderConfig::Demo),
            SourceKind::Http => {
                let url = self
                    .url
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .context("http source needs a url (--url or `url` in config)")?;
                Ok(ProviderConfig::Http(url.to_string()))
            }
            SourceKind::Sqlite => {
                let path = self
                    .db_path
                    .as_deref()
                    .and_then(expand_path)
                    .or_else(default_db_path)
                    .context("no database path and no data directory")?;
                Ok(ProviderConfig::Sqlite {
                    path,
                    seed: self.seed,
                })
            }
        }
    }
}

/// Load the config file from the lookup path, falling back to defaults
/// when there is none
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_or_default(&path),
        None => Config::default(),
    }
}

/// Missing, unreadable or malformed files yield the defaults
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring config");
            Config::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str::<Config>(&content).with_context(|| format!("parse {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CLINIC_DASH_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("clinic-dash").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("clinic-dash").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "clinic-dash", "clinic-dash")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("clinic-dash"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("clinic-dash"));
    }
    directories::ProjectDirs::from("io", "clinic-dash", "clinic-dash")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn default_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("appointments.sqlite3"))
}

pub fn default_log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("clinic-dash.log"))
}

pub fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;

    #[test]
    fn empty_config_is_demo_with_default_theme() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.source, SourceKind::Demo);
        assert!(!config.persist_status);
        assert_eq!(config.theme, Theme::default());
        assert_eq!(config.provider_config().unwrap(), ProviderConfig::Demo);
    }

    #[test]
    fn parses_http_source_and_theme_override() {
        let config: Config = toml::from_str(
            r##"
            source = "http"
            url = "localhost:4000/api"
            persist_status = true

            [theme]
            cancelled = "#aa0000"
            "##,
        )
        .unwrap();
        assert!(config.persist_status);
        assert_eq!(config.theme.cancelled, Color::rgb(0xaa, 0, 0));
        assert_eq!(
            config.provider_config().unwrap(),
            ProviderConfig::Http("localhost:4000/api".to_string())
        );
    }

    #[test]
    fn http_source_without_url_is_rejected() {
        let config: Config = toml::from_str("source = \"http\"\nurl = \"  \"").unwrap();
        assert!(config.provider_config().is_err());
    }

    #[test]
    fn sqlite_source_uses_configured_path() {
        let config: Config =
            toml::from_str("source = \"sqlite\"\ndb_path = \"/tmp/a.db\"\nseed = true").unwrap();
        assert_eq!(
            config.provider_config().unwrap(),
            ProviderConfig::Sqlite {
                path: PathBuf::from("/tmp/a.db"),
                seed: true
            }
        );
    }

    #[test]
    fn bad_theme_color_fails_the_parse() {
        assert!(toml::from_str::<Config>("[theme]\npending = \"orange\"").is_err());
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clinic-dash-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(load_or_default(&path), Config::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = scratch_path("malformed");
        fs::write(&path, "source = \"http\"\n[theme\npending = ").unwrap();
        let config = load_or_default(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.provider_config().unwrap(), ProviderConfig::Demo);
    }

    #[test]
    fn env_pointed_config_is_loaded_or_ignored() {
        let path = scratch_path("env");
        std::env::set_var("CLINIC_DASH_CONFIG", &path);

        fs::write(&path, "source = \"sqlite\"\nseed = true").unwrap();
        let good = load();
        fs::write(&path, "source = \"carrier-pigeon\"").unwrap();
        let bad = load();

        std::env::remove_var("CLINIC_DASH_CONFIG");
        fs::remove_file(&path).unwrap();
        assert_eq!(good.source, SourceKind::Sqlite);
        assert!(good.seed);
        assert_eq!(bad, Config::default());
    }
}
