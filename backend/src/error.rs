use std::fmt;

use thiserror::Error;

/// Where in the corpus a failure happened.
///
/// Line-level parsers only know the line they were given, so both fields start
/// empty and are filled in on the way out by [`CorpusError::in_entry`] and
/// [`CorpusError::in_archive`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub archive: String,
    pub entry: String,
}

impl Location {
    pub fn new(archive: &str, entry: &str) -> Self {
        Location {
            archive: archive.to_string(),
            entry: entry.to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "archive '{}', entry '{}'", self.archive, self.entry)
    }
}

/// Every failure of the corpus pipeline. All of them are fatal for the archive
/// being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorpusError {
    #[error("Archive is not a valid zip container: archive '{archive}': {reason}")]
    ArchiveCorrupt { archive: String, reason: String },

    #[error("Entry can't be read as text: {location}: {reason}")]
    EntryUnreadable { location: Location, reason: String },

    #[error("Unknown book abbreviation '{abbreviation}': {location}, line: {line:?}")]
    UnknownBookAbbreviation {
        location: Location,
        abbreviation: String,
        line: String,
    },

    #[error("No book abbreviations were parsed before this entry: {location}")]
    AbbreviationMappingMissing { location: Location },

    #[error("Malformed verse line ({reason}): {location}, line: {line:?}")]
    MalformedVerseLine {
        location: Location,
        line: String,
        reason: String,
    },

    #[error("Alphabetic chapter '{token}' appears before any numbered chapter: {location}, line: {line:?}")]
    NoPriorChapterForAlphabeticToken {
        location: Location,
        token: String,
        line: String,
    },

    #[error("Archive source unavailable: '{locator}': {reason}")]
    SourceUnavailable { locator: String, reason: String },
}

impl CorpusError {
    pub fn malformed(line: &str, reason: &str) -> Self {
        CorpusError::MalformedVerseLine {
            location: Location::default(),
            line: line.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn source_unavailable(locator: &str, reason: impl fmt::Display) -> Self {
        CorpusError::SourceUnavailable {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }

    fn location_mut(&mut self) -> Option<&mut Location> {
        match self {
            CorpusError::EntryUnreadable { location, .. }
            | CorpusError::UnknownBookAbbreviation { location, .. }
            | CorpusError::AbbreviationMappingMissing { location }
            | CorpusError::MalformedVerseLine { location, .. }
            | CorpusError::NoPriorChapterForAlphabeticToken { location, .. } => Some(location),
            CorpusError::ArchiveCorrupt { .. } | CorpusError::SourceUnavailable { .. } => None,
        }
    }

    /// Attach the entry name, unless one is already set.
    pub fn in_entry(mut self, entry: &str) -> Self {
        if let Some(location) = self.location_mut() {
            if location.entry.is_empty() {
                location.entry = entry.to_string();
            }
        }
        self
    }

    /// Attach the archive identifier, unless one is already set.
    pub fn in_archive(mut self, archive: &str) -> Self {
        if let CorpusError::ArchiveCorrupt { archive: a, .. } = &mut self {
            if a.is_empty() {
                *a = archive.to_string();
            }
        }
        if let Some(location) = self.location_mut() {
            if location.archive.is_empty() {
                location.archive = archive.to_string();
            }
        }
        self
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            CorpusError::EntryUnreadable { location, .. }
            | CorpusError::UnknownBookAbbreviation { location, .. }
            | CorpusError::AbbreviationMappingMissing { location }
            | CorpusError::MalformedVerseLine { location, .. }
            | CorpusError::NoPriorChapterForAlphabeticToken { location, .. } => Some(location),
            CorpusError::ArchiveCorrupt { .. } | CorpusError::SourceUnavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_filled_once() {
        let err = CorpusError::malformed("Gen 1", "missing ':'")
            .in_entry("kjv/Genesis.txt")
            .in_entry("other.txt")
            .in_archive("kjv-lds.zip");

        let location = err.location().unwrap();
        assert_eq!(location.entry, "kjv/Genesis.txt");
        assert_eq!(location.archive, "kjv-lds.zip");

        let msg = err.to_string();
        assert!(msg.contains("kjv-lds.zip"));
        assert!(msg.contains("Gen 1"));
    }

    #[test]
    fn test_source_unavailable_has_no_location() {
        let err = CorpusError::source_unavailable("https://x/y.zip", "timed out").in_archive("y.zip");
        assert!(err.location().is_none());
        assert_eq!(err.to_string(), "Archive source unavailable: 'https://x/y.zip': timed out");
    }
}
