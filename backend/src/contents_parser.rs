//! Parses a work's contents entry into an abbreviation → book name table.
//!
//! A mapping line looks like `Genesis . . . . . . . . Gen`. Lines without the
//! dot leader are headers or filler and are ignored.

use std::collections::HashMap;

use crate::error::CorpusError;

pub const DOT_LEADER: &str = ". . . .";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookAbbreviations {
    book_by_abbreviation: HashMap<String, String>,
}

impl BookAbbreviations {
    pub fn new() -> Self {
        BookAbbreviations::default()
    }

    pub fn insert(&mut self, abbreviation: &str, book: &str) {
        self.book_by_abbreviation.insert(abbreviation.to_string(), book.to_string());
    }

    pub fn resolve(&self, abbreviation: &str) -> Option<&str> {
        self.book_by_abbreviation.get(abbreviation).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.book_by_abbreviation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book_by_abbreviation.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for BookAbbreviations {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut abbreviations = BookAbbreviations::new();
        for (abbreviation, book) in iter {
            abbreviations.insert(abbreviation, book);
        }
        abbreviations
    }
}

/// Returns `(abbreviation, book name)` for a mapping line.
///
/// The first and last dot-separated fields are the book name and the
/// abbreviation. Spaces are removed from both, not only trimmed, so
/// `1 Nephi . . . . 1 Ne` gives `("1Ne", "1Nephi")`.
pub fn parse_contents_line(line: &str) -> Option<(String, String)> {
    if !line.contains(DOT_LEADER) {
        return None;
    }

    let mut fields = line.split('.');
    let book = fields.next()?.replace(' ', "");
    let abbreviation = fields.next_back()?.replace(' ', "");

    Some((abbreviation, book))
}

/// Later lines win for a repeated abbreviation.
pub fn parse_contents<I>(lines: I) -> Result<BookAbbreviations, CorpusError>
where
    I: IntoIterator<Item = Result<String, CorpusError>>,
{
    let mut abbreviations = BookAbbreviations::new();
    for line in lines {
        let line = line?;
        if let Some((abbreviation, book)) = parse_contents_line(&line) {
            abbreviations.insert(&abbreviation, &book);
        }
    }
    Ok(abbreviations)
}
