use std::fmt::{self, Write as _};
use std::fs::{create_dir_all, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "log.txt";

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
/// Silent < Error < Warn < Info < Debug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    /// The matching `EnvFilter` directive.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Silent => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// An `EnvFilter` directive string.
    pub filter: String,
    /// `None` when file logging is disabled.
    pub log_file: Option<PathBuf>,
}

impl LogSettings {
    /// `RUST_LOG` takes precedence over `LOG_LEVEL`. `DISABLE_LOG=true` turns
    /// off the `log.txt` file in `data_dir`.
    pub fn from_vars<F>(data_dir: &Path, get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let filter = get("RUST_LOG").filter(|s| !s.is_empty()).unwrap_or_else(|| {
            get("LOG_LEVEL")
                .and_then(|v| Level::from_str(&v))
                .unwrap_or(Level::Info)
                .as_directive()
                .to_string()
        });

        let disable_log = get("DISABLE_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        LogSettings {
            filter,
            log_file: (!disable_log).then(|| data_dir.join(LOG_FILE_NAME)),
        }
    }

    pub fn from_env(data_dir: &Path) -> Self {
        Self::from_vars(data_dir, |key| std::env::var(key).ok())
    }
}

/// UTC timestamps in the `log.txt` line format.
struct UtcTimestamp;

impl FormatTime for UtcTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{}]", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ"))
    }
}

/// An fmt layer to stderr, plus a plain-text layer appending to the log file
/// when one is configured. Both see the same filtered events.
pub fn build_subscriber(settings: &LogSettings) -> Result<Box<dyn Subscriber + Send + Sync>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match &settings.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_timer(UtcTimestamp)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    Ok(Box::new(subscriber))
}

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber, logging to `data_dir/log.txt`. Only the
/// first call has an effect.
pub fn init(data_dir: &Path) {
    TRACING_INITIALIZED.get_or_init(|| {
        let settings = LogSettings::from_env(data_dir);
        let subscriber = match build_subscriber(&settings) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to open log file, logging to stderr only: {}", e);
                let stderr_only = LogSettings { log_file: None, ..settings };
                match build_subscriber(&stderr_only) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("Failed to initialize tracing: {}", e);
                        return;
                    }
                }
            }
        };
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
