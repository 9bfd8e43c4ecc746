use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use anyhow::Result;

use scriptures_backend::config::{validate_table_name, ScripturesConfig};
use scriptures_backend::corpus_builder::CorpusBuilder;
use scriptures_backend::db::{verse_counts_by_work, SqliteSink};
use scriptures_backend::download::download_archives;
use scriptures_backend::logger;
use scriptures_backend::source::{expand_locators, AutoSource};

fn build_database(sources: &[String], db_path: &Path, table_name: &str) -> Result<()> {
    validate_table_name(table_name)?;
    let locators = expand_locators(sources)?;

    tracing::info!("Building {} from {} archives", db_path.display(), locators.len());

    let source = AutoSource::new();
    let mut sink = SqliteSink::open(db_path)?;
    let count = CorpusBuilder::new(&source).build_and_store(&locators, &mut sink, table_name)?;

    tracing::info!("Inserted {} verses into {}", count, table_name);
    println!("{}", count);
    Ok(())
}

fn download(sources: &[String], out_dir: &Path) -> Result<()> {
    let source = AutoSource::new();
    let written = download_archives(&source, sources, out_dir)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn count_verses(db_path: &Path, table_name: &str) -> Result<()> {
    if !db_path.exists() {
        anyhow::bail!("Database does not exist: {:?}", db_path);
    }
    for row in verse_counts_by_work(db_path, table_name)? {
        println!("{}: {}", row.work, row.verse_count);
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scriptures corpus builder", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to the data directory, where log.txt is written.
    /// If not provided, the SCRIPTURES_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "SCRIPTURES_DIR")]
    scriptures_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the archives, parse them and write the verses table
    Build {
        /// SQLite database file
        #[arg(long, value_name = "FILE_PATH", env = "SCRIPTURES_DB")]
        db: Option<PathBuf>,

        /// Table to recreate
        #[arg(long, env = "SCRIPTURES_TABLE")]
        table: Option<String>,

        /// Archive URLs, zip files, or directories of zip files.
        /// Defaults to SCRIPTURES_SOURCES or the standard four archives.
        #[arg(value_name = "SOURCES")]
        sources: Vec<String>,
    },

    /// Save the archives locally without parsing them
    Download {
        /// Directory to write the archives to
        #[arg(long, value_name = "DIRECTORY_PATH", env = "SCRIPTURES_DOWNLOADS_DIR")]
        out: Option<PathBuf>,

        /// Archive URLs. Defaults to SCRIPTURES_SOURCES or the standard four archives.
        #[arg(value_name = "SOURCES")]
        sources: Vec<String>,
    },

    /// Print the number of stored verses per work
    Count {
        /// SQLite database file
        #[arg(long, value_name = "FILE_PATH", env = "SCRIPTURES_DB")]
        db: Option<PathBuf>,

        /// Table to read
        #[arg(long, env = "SCRIPTURES_TABLE")]
        table: Option<String>,
    },
}

fn or_default_sources(sources: Vec<String>, config: &ScripturesConfig) -> Vec<String> {
    if sources.is_empty() {
        config.archive_sources.clone()
    } else {
        sources
    }
}

fn main() {
    // Attempt to load .env file. This might define SCRIPTURES_DIR and the other
    // SCRIPTURES_* variables. Clap picks them up via `env = ...`.
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    let mut config = match ScripturesConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            exit(1);
        }
    };
    if let Some(dir) = cli.scriptures_dir.clone() {
        config.data_dir = dir;
    }

    logger::init(&config.data_dir);

    let command_result = match cli.command {
        Commands::Build { db, table, sources } => {
            let db = db.unwrap_or_else(|| config.db_path.clone());
            let table = table.unwrap_or_else(|| config.table_name.clone());
            build_database(&or_default_sources(sources, &config), &db, &table)
        }

        Commands::Download { out, sources } => {
            let out = out.unwrap_or_else(|| config.downloads_dir.clone());
            download(&or_default_sources(sources, &config), &out)
        }

        Commands::Count { db, table } => {
            let db = db.unwrap_or_else(|| config.db_path.clone());
            let table = table.unwrap_or_else(|| config.table_name.clone());
            count_verses(&db, &table)
        }
    };

    if let Err(e) = command_result {
        tracing::error!("{:#}", e);
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
