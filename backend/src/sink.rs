use anyhow::{bail, Result};

use crate::types::{Corpus, VerseRecord};

/// Destination for flattened verses.
///
/// Callers create the table once, insert every record, and then commit once.
/// Nothing is visible to readers before `commit` returns.
pub trait VerseSink {
    /// Drops and recreates `table_name`.
    fn create_table(&mut self, table_name: &str) -> Result<()>;

    fn insert(&mut self, record: &VerseRecord<'_>) -> Result<()>;

    fn commit(&mut self) -> Result<()>;
}

/// Owned copy of a stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVerse {
    pub work: String,
    pub book: String,
    pub chapter: i64,
    pub verse: u32,
    pub text: String,
}

impl From<&VerseRecord<'_>> for StoredVerse {
    fn from(r: &VerseRecord<'_>) -> Self {
        StoredVerse {
            work: r.work.to_string(),
            book: r.book.to_string(),
            chapter: r.chapter,
            verse: r.verse,
            text: r.text.to_string(),
        }
    }
}

/// Holds rows in memory. Useful for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub table_name: Option<String>,
    pub rows: Vec<StoredVerse>,
    pub committed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }
}

impl VerseSink for MemorySink {
    fn create_table(&mut self, table_name: &str) -> Result<()> {
        self.table_name = Some(table_name.to_string());
        self.rows.clear();
        self.committed = false;
        Ok(())
    }

    fn insert(&mut self, record: &VerseRecord<'_>) -> Result<()> {
        if self.table_name.is_none() {
            bail!("insert() called before create_table()");
        }
        self.rows.push(record.into());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }
}

/// Writes the whole corpus in flattening order. Returns the number of rows.
pub fn store_corpus<S: VerseSink + ?Sized>(corpus: &Corpus, sink: &mut S, table_name: &str) -> Result<usize> {
    sink.create_table(table_name)?;

    let mut count = 0;
    for record in corpus.verse_records() {
        sink.insert(&record)?;
        count += 1;
    }

    sink.commit()?;
    tracing::info!("Stored {} verses in table {}", count, table_name);
    Ok(count)
}
