use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::source::{locator_file_name, ArchiveSource};

pub const DOWNLOAD_README: &str = "readme.md";

/// Saves each archive as `out_dir/<file name>` and records the download time
/// in `out_dir/readme.md`. Returns the archive paths in locator order.
pub fn download_archives<S: ArchiveSource + ?Sized>(
    source: &S,
    locators: &[String],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {:?}", out_dir))?;

    let mut written = Vec::new();
    for locator in locators {
        let bytes = source.fetch(locator)?;
        let output_path = out_dir.join(locator_file_name(locator));

        fs::write(&output_path, &bytes)
            .with_context(|| format!("Failed to write: {:?}", output_path))?;
        tracing::info!("File downloaded and saved to {:?}", output_path);

        written.push(output_path);
    }

    let readme = format!("Zip files downloaded on {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    fs::write(out_dir.join(DOWNLOAD_README), readme)
        .with_context(|| format!("Failed to write {} in {:?}", DOWNLOAD_README, out_dir))?;

    Ok(written)
}
