use crate::contents_parser::BookAbbreviations;
use crate::error::{CorpusError, Location};
use crate::types::RawVerse;

/// Parses `<abbreviation> <chapter>:<verse> <text...>`.
///
/// Tokens are separated by single spaces. The text is everything after the
/// second space, kept as-is. The chapter token is kept as a string, since some
/// works use letters for front-matter sections.
pub fn parse_verse_line(line: &str, abbreviations: &BookAbbreviations) -> Result<RawVerse, CorpusError> {
    let mut tokens = line.splitn(3, ' ');

    let abbreviation = tokens.next().unwrap_or_default();
    let reference = tokens
        .next()
        .ok_or_else(|| CorpusError::malformed(line, "missing chapter:verse reference"))?;
    let text = tokens.next().unwrap_or_default();

    let mut reference_parts = reference.split(':');
    let chapter = reference_parts.next().unwrap_or_default();
    let verse_token = reference_parts
        .next()
        .ok_or_else(|| CorpusError::malformed(line, "reference has no ':'"))?;

    let verse: u32 = verse_token
        .parse()
        .map_err(|_| CorpusError::malformed(line, &format!("verse '{}' is not a number", verse_token)))?;
    if verse == 0 {
        return Err(CorpusError::malformed(line, "verse numbers start at 1"));
    }

    let book = abbreviations
        .resolve(abbreviation)
        .ok_or_else(|| CorpusError::UnknownBookAbbreviation {
            location: Location::default(),
            abbreviation: abbreviation.to_string(),
            line: line.to_string(),
        })?;

    Ok(RawVerse {
        book: book.to_string(),
        chapter: chapter.to_string(),
        verse,
        text: text.to_string(),
    })
}
