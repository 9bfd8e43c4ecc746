use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use dotenvy::dotenv;
use lazy_static::lazy_static;
use regex::Regex;

use crate::default_scriptures_dir;

pub const DEFAULT_ARCHIVE_URLS: [&str; 4] = [
    "https://ldsguy.tripod.com/Iron-rod/kjv-lds.zip",
    "https://ldsguy.tripod.com/Iron-rod/bom.zip",
    "https://ldsguy.tripod.com/Iron-rod/dnc.zip",
    "https://ldsguy.tripod.com/Iron-rod/pofgp.zip",
];

pub const DEFAULT_DB_PATH: &str = "scriptures.db";
pub const DEFAULT_TABLE_NAME: &str = "scriptures";
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";

lazy_static! {
    static ref RE_SQL_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// The table name is interpolated into SQL, so only plain identifiers are accepted.
pub fn validate_table_name(name: &str) -> Result<()> {
    if !RE_SQL_IDENTIFIER.is_match(name) {
        bail!("Invalid table name: {:?}", name);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScripturesConfig {
    pub archive_sources: Vec<String>,
    pub db_path: PathBuf,
    pub table_name: String,
    pub downloads_dir: PathBuf,
    /// Holds `log.txt`.
    pub data_dir: PathBuf,
}

impl Default for ScripturesConfig {
    fn default() -> Self {
        ScripturesConfig {
            archive_sources: DEFAULT_ARCHIVE_URLS.iter().map(|s| s.to_string()).collect(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            downloads_dir: PathBuf::from(DEFAULT_DOWNLOADS_DIR),
            data_dir: PathBuf::from("."),
        }
    }
}

/// Comma-separated locators, blanks dropped.
pub fn parse_sources_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ScripturesConfig {
    /// Reads `.env` if there is one, then the `SCRIPTURES_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ScripturesConfig::default();

        if let Some(s) = get("SCRIPTURES_SOURCES") {
            let sources = parse_sources_list(&s);
            if !sources.is_empty() {
                config.archive_sources = sources;
            }
        }
        if let Some(s) = get("SCRIPTURES_DB").filter(|s| !s.is_empty()) {
            config.db_path = PathBuf::from(s);
        }
        if let Some(s) = get("SCRIPTURES_TABLE").filter(|s| !s.is_empty()) {
            config.table_name = s;
        }
        if let Some(s) = get("SCRIPTURES_DOWNLOADS_DIR").filter(|s| !s.is_empty()) {
            config.downloads_dir = PathBuf::from(s);
        }

        config.data_dir = match get("SCRIPTURES_DIR").filter(|s| !s.is_empty()) {
            Some(s) => PathBuf::from(s),
            None => default_scriptures_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        validate_table_name(&config.table_name)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ScripturesConfig> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ScripturesConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("SCRIPTURES_DIR", "/tmp/scriptures")]).unwrap();
        assert_eq!(config.archive_sources.len(), 4);
        assert!(config.archive_sources[1].ends_with("bom.zip"));
        assert_eq!(config.db_path, PathBuf::from("scriptures.db"));
        assert_eq!(config.table_name, "scriptures");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/scriptures"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SCRIPTURES_DIR", "/tmp/scriptures"),
            ("SCRIPTURES_SOURCES", "downloads/bom.zip, ,downloads/dnc.zip"),
            ("SCRIPTURES_DB", "out/test.db"),
            ("SCRIPTURES_TABLE", "verses_v2"),
        ])
        .unwrap();
        assert_eq!(config.archive_sources, vec!["downloads/bom.zip", "downloads/dnc.zip"]);
        assert_eq!(config.db_path, PathBuf::from("out/test.db"));
        assert_eq!(config.table_name, "verses_v2");
    }

    #[test]
    fn test_invalid_table_name() {
        assert!(config_from(&[("SCRIPTURES_DIR", "/tmp/x"), ("SCRIPTURES_TABLE", "x; DROP TABLE y")]).is_err());
        assert!(validate_table_name("1abc").is_err());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("_scriptures2").is_ok());
    }
}
