pub mod error;
pub mod types;
pub mod archive_reader;
pub mod contents_parser;
pub mod verse_parser;
pub mod book_builder;
pub mod work_builder;
pub mod flatten;
pub mod corpus_builder;
pub mod source;
pub mod sink;
pub mod download;
pub mod config;
pub mod logger;

pub mod db;

use std::env;
use std::path::PathBuf;
use std::error::Error;
use app_dirs::{get_app_root, AppDataType, AppInfo};

pub use error::{CorpusError, Location};
pub use types::{Book, Chapter, Corpus, RawVerse, Verse, VerseRecord, Work};

pub const APP_INFO: AppInfo = AppInfo{name: "scriptures-db", author: "scriptures"};

/// The per-user data directory. Not created here; the logger creates it when
/// it opens `log.txt`.
pub fn default_scriptures_dir() -> Result<PathBuf, Box<dyn Error>> {
    match env::var("SCRIPTURES_DIR") {
        Ok(s) if !s.is_empty() => Ok(PathBuf::from(s)),
        _ => Ok(get_app_root(AppDataType::UserData, &APP_INFO)?),
    }
}
