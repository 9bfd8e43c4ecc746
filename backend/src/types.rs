//! The work → book → chapter → verse tree.
//!
//! Every level is an [`IndexMap`], so iteration follows first-insertion order
//! and re-inserting an existing key replaces the value in place. The derived
//! `PartialEq` compares contents only, not order.

use indexmap::IndexMap;

/// One parsed verse line, before it is placed in the tree.
///
/// `chapter` stays a string because some works label front matter with
/// letters instead of chapter numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVerse {
    pub book: String,
    pub chapter: String,
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Negative or zero for chapters synthesized from alphabetic labels.
    pub number: i64,
    pub verses: IndexMap<u32, Verse>,
}

impl Chapter {
    pub fn new(number: i64) -> Self {
        Chapter {
            number,
            verses: IndexMap::new(),
        }
    }

    /// Last write wins for a repeated verse number.
    pub fn insert_verse(&mut self, verse: Verse) {
        self.verses.insert(verse.number, verse);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Book {
    pub name: String,
    pub chapters: IndexMap<i64, Chapter>,
}

impl Book {
    pub fn new(name: &str) -> Self {
        Book {
            name: name.to_string(),
            chapters: IndexMap::new(),
        }
    }

    pub fn chapter_mut(&mut self, number: i64) -> &mut Chapter {
        self.chapters
            .entry(number)
            .or_insert_with(|| Chapter::new(number))
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(|c| c.verses.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Work {
    pub name: String,
    pub books: IndexMap<String, Book>,
}

impl Work {
    pub fn new(name: &str) -> Self {
        Work {
            name: name.to_string(),
            books: IndexMap::new(),
        }
    }

    /// A later book with the same name replaces the earlier one.
    pub fn insert_book(&mut self, book: Book) {
        self.books.insert(book.name.clone(), book);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    pub works: IndexMap<String, Work>,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus::default()
    }

    /// Works only enter the corpus once they are complete.
    pub fn insert_work(&mut self, work: Work) {
        self.works.insert(work.name.clone(), work);
    }

    pub fn verse_count(&self) -> usize {
        self.works
            .values()
            .flat_map(|w| w.books.values())
            .map(Book::verse_count)
            .sum()
    }
}

/// A flattened, persistence-ready verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRecord<'a> {
    pub work: &'a str,
    pub book: &'a str,
    pub chapter: i64,
    pub verse: u32,
    pub text: &'a str,
}
