pub mod scriptures;
pub mod scriptures_models;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use diesel::prelude::*;

pub use scriptures::{load_verses, verse_counts_by_work, SqliteSink};

pub fn establish_connection(db_path: &Path) -> Result<SqliteConnection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let db_url = db_path.to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid database path"))?;

    SqliteConnection::establish(db_url)
        .with_context(|| format!("Failed to connect to database: {}", db_url))
}
