//! Where archive bytes come from.
//!
//! Nothing here retries. A failed fetch is reported as
//! [`CorpusError::SourceUnavailable`] and the run stops.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use walkdir::WalkDir;

use crate::error::CorpusError;

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

pub trait ArchiveSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, CorpusError>;
}

pub fn is_url(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// The last path segment of a URL or file path, used to name a downloaded
/// archive and to label it in logs.
pub fn locator_file_name(locator: &str) -> &str {
    let trimmed = locator.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, CorpusError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CorpusError::source_unavailable("<http client>", e))?;
        Ok(HttpSource { client })
    }
}

impl ArchiveSource for HttpSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, CorpusError> {
        tracing::info!("Fetching {}", locator);

        let response = self
            .client
            .get(locator)
            .send()
            .map_err(|e| CorpusError::source_unavailable(locator, e))?;

        if !response.status().is_success() {
            return Err(CorpusError::source_unavailable(
                locator,
                format!("server returned {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .map_err(|e| CorpusError::source_unavailable(locator, e))?;
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl ArchiveSource for FileSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, CorpusError> {
        tracing::info!("Reading {}", locator);
        fs::read(locator).map_err(|e| CorpusError::source_unavailable(locator, e))
    }
}

/// URLs go over HTTP, everything else is read from disk. The HTTP client is
/// only built when a URL is first fetched.
#[derive(Default)]
pub struct AutoSource {
    http: std::cell::OnceCell<HttpSource>,
}

impl AutoSource {
    pub fn new() -> Self {
        AutoSource::default()
    }

    fn http(&self) -> Result<&HttpSource, CorpusError> {
        if let Some(http) = self.http.get() {
            return Ok(http);
        }
        let http = HttpSource::new()?;
        Ok(self.http.get_or_init(|| http))
    }
}

impl ArchiveSource for AutoSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, CorpusError> {
        if is_url(locator) {
            self.http()?.fetch(locator)
        } else {
            FileSource.fetch(locator)
        }
    }
}

/// Replaces each local directory in `locators` with the `.zip` files inside
/// it, sorted by path. URLs and plain files pass through unchanged.
pub fn expand_locators(locators: &[String]) -> Result<Vec<String>, CorpusError> {
    let mut expanded = Vec::new();

    for locator in locators {
        let path = Path::new(locator);
        if is_url(locator) || !path.is_dir() {
            expanded.push(locator.clone());
            continue;
        }

        let mut zips: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|e| CorpusError::source_unavailable(locator, e))?;
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("zip") {
                zips.push(p.to_path_buf());
            }
        }
        zips.sort();

        if zips.is_empty() {
            tracing::warn!("No .zip archives found in {}", locator);
        }
        expanded.extend(zips.into_iter().map(|p| p.to_string_lossy().to_string()));
    }

    Ok(expanded)
}
