// Settings loader
// Layers: built-in defaults, ~/.config/review-scheduler/config.toml,
// an explicit --config file, then REVIEW_* environment variables.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_QUEUE_LIMIT: usize = 50;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Settings {
    pub database_path: PathBuf,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    pub queue_limit: usize,
    pub user_id: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("review.sqlite3"),
            catalog_path: None,
            queue_limit: DEFAULT_QUEUE_LIMIT,
            user_id: "default".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(default_config_file(), explicit)
    }

    fn load_from(user_file: Option<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("database_path", defaults.database_path.to_string_lossy().as_ref())?
            .set_default("queue_limit", defaults.queue_limit as i64)?
            .set_default("user_id", defaults.user_id)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = user_file {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder = builder.add_source(Environment::with_prefix("REVIEW").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("review-scheduler").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(dir.path().join("missing.toml")), None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.toml");
        fs::write(
            &path,
            "queue_limit = 20\ncatalog_path = \"italian.json\"\nuser_id = \"anna\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(None, Some(&path)).unwrap();
        assert_eq!(settings.queue_limit, 20);
        assert_eq!(settings.catalog_path, Some(PathBuf::from("italian.json")));
        assert_eq!(settings.user_id, "anna");
        assert_eq!(settings.database_path, PathBuf::from("review.sqlite3"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load_from(None, Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
