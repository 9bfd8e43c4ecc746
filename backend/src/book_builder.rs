use std::collections::HashMap;

use crate::contents_parser::BookAbbreviations;
use crate::error::CorpusError;
use crate::types::{Book, Verse};
use crate::verse_parser::parse_verse_line;

/// Assembles the verse lines of one archive entry into a [`Book`].
///
/// Alphabetic chapter labels get a synthetic number one below the lowest
/// chapter seen so far in the entry, and keep that number for the rest of the
/// entry.
#[derive(Debug, Default)]
pub struct BookBuilder {
    book: Book,
    alpha_chapters: HashMap<String, i64>,
    book_name: Option<String>,
}

pub fn is_alphabetic_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

impl BookBuilder {
    pub fn new() -> Self {
        BookBuilder::default()
    }

    fn chapter_number(&mut self, token: &str, line: &str) -> Result<i64, CorpusError> {
        if let Some(n) = self.alpha_chapters.get(token) {
            return Ok(*n);
        }

        if is_alphabetic_token(token) {
            let lowest = self.book.chapters.keys().min().copied().ok_or_else(|| {
                CorpusError::NoPriorChapterForAlphabeticToken {
                    location: Default::default(),
                    token: token.to_string(),
                    line: line.to_string(),
                }
            })?;
            let n = lowest.checked_sub(1).ok_or_else(|| {
                CorpusError::malformed(line, &format!("no chapter number below {} for '{}'", lowest, token))
            })?;
            self.alpha_chapters.insert(token.to_string(), n);
            return Ok(n);
        }

        token
            .parse()
            .map_err(|_| CorpusError::malformed(line, &format!("chapter '{}' is neither a number nor a letter label", token)))
    }

    pub fn push_line(&mut self, line: &str, abbreviations: &BookAbbreviations) -> Result<(), CorpusError> {
        let raw = parse_verse_line(line, abbreviations)?;
        let chapter = self.chapter_number(&raw.chapter, line)?;

        self.book.chapter_mut(chapter).insert_verse(Verse {
            number: raw.verse,
            text: raw.text,
        });
        self.book_name = Some(raw.book);

        Ok(())
    }

    /// `None` if no verse line was pushed. The book takes the name of the last
    /// verse pushed.
    pub fn finish(self) -> Option<Book> {
        let mut book = self.book;
        book.name = self.book_name?;
        Some(book)
    }
}

/// Builds one book from an entry's lines. The entry name is attached to any error.
pub fn build_book<I>(entry_name: &str, lines: I, abbreviations: &BookAbbreviations) -> Result<Option<Book>, CorpusError>
where
    I: IntoIterator<Item = Result<String, CorpusError>>,
{
    let mut builder = BookBuilder::new();
    for line in lines {
        let line = line.map_err(|e| e.in_entry(entry_name))?;
        builder
            .push_line(&line, abbreviations)
            .map_err(|e| e.in_entry(entry_name))?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abbreviations() -> BookAbbreviations {
        [("Moro", "Moroni"), ("Abr", "Abraham"), ("Fac", "Facsimiles")].into_iter().collect()
    }

    fn build(lines: &[&str]) -> Result<Option<Book>, CorpusError> {
        build_book("pgp/Abraham.txt", lines.iter().map(|l| Ok(l.to_string())), &abbreviations())
    }

    #[test]
    fn test_builds_chapters_and_verses() {
        let book = build(&["Moro 1:1 Hello", "Moro 1:2 World", "Moro 2:1 Again"]).unwrap().unwrap();
        assert_eq!(book.name, "Moroni");
        assert_eq!(book.chapters.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(book.chapters[&1_i64].verses[&2_u32].text, "World");
        assert_eq!(book.verse_count(), 3);
    }

    #[test]
    fn test_alphabetic_chapter_after_numbered() {
        let book = build(&["Abr 1:1 one", "Abr 2:1 two", "Abr A:1 a1", "Abr A:2 a2"]).unwrap().unwrap();
        assert_eq!(book.chapters.keys().copied().collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(book.chapters[&0_i64].verses.len(), 2);
        assert_eq!(book.chapters[&0_i64].number, 0);
    }

    #[test]
    fn test_second_alphabetic_label_goes_lower() {
        let book = build(&["Abr 1:1 one", "Abr A:1 a", "Abr B:1 b", "Abr A:2 a again"]).unwrap().unwrap();
        assert_eq!(book.chapters.keys().copied().collect::<Vec<_>>(), vec![1, 0, -1]);
        assert_eq!(book.chapters[&0_i64].verses.len(), 2);
        assert_eq!(book.chapters[&-1_i64].verses[&1_u32].text, "b");
    }

    #[test]
    fn test_alphabetic_label_without_prior_chapter() {
        match build(&["Abr A:1 a"]) {
            Err(CorpusError::NoPriorChapterForAlphabeticToken { location, token, line }) => {
                assert_eq!(token, "A");
                assert_eq!(line, "Abr A:1 a");
                assert_eq!(location.entry, "pgp/Abraham.txt");
            }
            other => panic!("expected NoPriorChapterForAlphabeticToken, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_verse_overwrites() {
        let book = build(&["Moro 1:1 first", "Moro 1:2 middle", "Moro 1:1 second"]).unwrap().unwrap();
        let chapter = &book.chapters[&1_i64];
        assert_eq!(chapter.verses.len(), 2);
        assert_eq!(chapter.verses[&1_u32].text, "second");
        assert_eq!(chapter.verses.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_name_comes_from_last_verse() {
        let book = build(&["Abr 1:1 one", "Fac 1:1 figure"]).unwrap().unwrap();
        assert_eq!(book.name, "Facsimiles");
    }

    #[test]
    fn test_empty_entry_has_no_book() {
        assert_eq!(build(&[]).unwrap(), None);
    }

    #[test]
    fn test_bad_chapter_token() {
        assert!(matches!(
            build(&["Moro 1:1 ok", "Moro 1a:1 bad"]),
            Err(CorpusError::MalformedVerseLine { .. })
        ));
    }

    #[test]
    fn test_alphabetic_label_below_minimum_chapter() {
        match build(&["Moro -9223372036854775808:1 x", "Moro A:1 y"]) {
            Err(CorpusError::MalformedVerseLine { location, line, .. }) => {
                assert_eq!(line, "Moro A:1 y");
                assert_eq!(location.entry, "pgp/Abraham.txt");
            }
            other => panic!("expected MalformedVerseLine, got {:?}", other),
        }
    }

    #[test]
    fn test_is_alphabetic_token() {
        assert!(is_alphabetic_token("A"));
        assert!(is_alphabetic_token("Preface"));
        assert!(!is_alphabetic_token(""));
        assert!(!is_alphabetic_token("12"));
        assert!(!is_alphabetic_token("A1"));
    }
}
