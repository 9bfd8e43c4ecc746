//! Depth-first flattening of a [`Corpus`] into [`VerseRecord`]s, and the
//! reverse grouping.
//!
//! Works, books, chapters and verses come out in the order they were first
//! inserted. Row ids are assigned downstream in this order, so it is part of
//! the contract.

use crate::types::{Book, Corpus, Verse, VerseRecord, Work};

impl Corpus {
    /// A fresh pass over every verse. Call again to start over.
    pub fn verse_records(&self) -> impl Iterator<Item = VerseRecord<'_>> + '_ {
        self.works.values().flat_map(|work| {
            work.books.values().flat_map(move |book| {
                book.chapters.values().flat_map(move |chapter| {
                    chapter.verses.values().map(move |verse| VerseRecord {
                        work: &work.name,
                        book: &book.name,
                        chapter: chapter.number,
                        verse: verse.number,
                        text: &verse.text,
                    })
                })
            })
        })
    }

    /// Groups flat records back into a tree, creating each level on first
    /// occurrence.
    pub fn from_records<'a, I>(records: I) -> Corpus
    where
        I: IntoIterator<Item = VerseRecord<'a>>,
    {
        let mut corpus = Corpus::new();
        for record in records {
            let work = corpus
                .works
                .entry(record.work.to_string())
                .or_insert_with(|| Work::new(record.work));
            let book = work
                .books
                .entry(record.book.to_string())
                .or_insert_with(|| Book::new(record.book));
            book.chapter_mut(record.chapter).insert_verse(Verse {
                number: record.verse,
                text: record.text.to_string(),
            });
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus() {
        assert_eq!(Corpus::new().verse_records().count(), 0);
    }

    #[test]
    fn test_insertion_order_not_numeric_order() {
        let mut book = Book::new("Abraham");
        book.chapter_mut(1).insert_verse(Verse { number: 2, text: "b".into() });
        book.chapter_mut(1).insert_verse(Verse { number: 1, text: "a".into() });
        book.chapter_mut(0).insert_verse(Verse { number: 1, text: "front".into() });
        let mut work = Work::new("pgp");
        work.insert_book(book);
        let mut corpus = Corpus::new();
        corpus.insert_work(work);

        let keys: Vec<(i64, u32)> = corpus.verse_records().map(|r| (r.chapter, r.verse)).collect();
        assert_eq!(keys, vec![(1, 2), (1, 1), (0, 1)]);
    }
}
