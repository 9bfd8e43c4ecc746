use crate::archive_reader::ArchiveReader;
use crate::book_builder::build_book;
use crate::contents_parser::{parse_contents, BookAbbreviations};
use crate::error::{CorpusError, Location};
use crate::types::Work;

/// Entry names containing any of these carry no verses.
pub const SKIPPED_ENTRY_MARKERS: [&str; 3] = ["Readme", "index", "Facsimile"];

/// Entry names containing this hold the abbreviation table.
pub const CONTENTS_ENTRY_MARKER: &str = "Contents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Skipped,
    Contents,
    Book,
}

pub fn classify_entry(name: &str) -> EntryKind {
    if name.ends_with('/') || SKIPPED_ENTRY_MARKERS.iter().any(|m| name.contains(m)) {
        EntryKind::Skipped
    } else if name.contains(CONTENTS_ENTRY_MARKER) {
        EntryKind::Contents
    } else {
        EntryKind::Book
    }
}

/// The top-level directory of an entry name: `bom/Moroni.txt` -> `bom`.
pub fn work_name_from_entry(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Aggregates every entry of one archive into a [`Work`].
///
/// The contents entry has to come before any book entry. Its table is used for
/// all following entries until another contents entry replaces it. Skipped
/// entries are never decompressed. The work is named after the top-level
/// directory of the last entry, whatever kind of entry that is.
pub fn build_work(label: &str, bytes: Vec<u8>) -> Result<Work, CorpusError> {
    let mut reader = ArchiveReader::open(label, bytes)?;
    tracing::info!("Building work from {} ({} entries)", label, reader.len());

    let mut abbreviations: Option<BookAbbreviations> = None;
    let mut work = Work::default();
    let mut last_entry_name: Option<String> = None;

    while let Some(entry) = reader.next_entry() {
        let entry = entry.map_err(|e| e.in_archive(label))?;
        let name = entry.name().to_string();
        last_entry_name = Some(name.clone());

        match classify_entry(&name) {
            EntryKind::Skipped => {
                tracing::debug!("Skipping entry {}", name);
            }

            EntryKind::Contents => {
                let lines = entry.lines().map_err(|e| e.in_archive(label))?;
                let parsed = parse_contents(lines).map_err(|e| e.in_archive(label))?;
                tracing::info!("Parsed {} book abbreviations from {}", parsed.len(), name);
                abbreviations = Some(parsed);
            }

            EntryKind::Book => {
                let active = match &abbreviations {
                    Some(a) if !a.is_empty() => a,
                    _ => {
                        return Err(CorpusError::AbbreviationMappingMissing {
                            location: Location::new(label, &name),
                        });
                    }
                };

                let lines = entry.lines().map_err(|e| e.in_archive(label))?;
                match build_book(&name, lines, active).map_err(|e| e.in_archive(label))? {
                    Some(book) => {
                        tracing::debug!(
                            "Built book {} from {}: {} chapters, {} verses",
                            book.name,
                            name,
                            book.chapters.len(),
                            book.verse_count()
                        );
                        work.insert_book(book);
                    }
                    None => tracing::warn!("Entry {} in {} has no verse lines", name, label),
                }
            }
        }
    }

    let last_entry_name = last_entry_name.ok_or_else(|| CorpusError::ArchiveCorrupt {
        archive: label.to_string(),
        reason: "archive has no entries".to_string(),
    })?;
    work.name = work_name_from_entry(&last_entry_name).to_string();

    tracing::info!("Built work {}: {} books", work.name, work.books.len());
    Ok(work)
}
