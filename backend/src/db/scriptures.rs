use std::path::Path;

use anyhow::{Context, Result};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};

use crate::config::validate_table_name;
use crate::db::establish_connection;
use crate::db::scriptures_models::{ScriptureRow, WorkVerseCount};
use crate::sink::VerseSink;
use crate::types::VerseRecord;

fn create_table_sql(table_name: &str) -> String {
    format!(
        "CREATE TABLE {} (
            id INTEGER PRIMARY KEY,
            work TEXT NOT NULL,
            book TEXT NOT NULL,
            chapter INTEGER NOT NULL,
            verse INTEGER NOT NULL,
            scripture TEXT NOT NULL
        )",
        table_name
    )
}

/// Writes verses to a SQLite table inside one transaction.
///
/// The transaction opens in `create_table` and closes in `commit`. A sink
/// dropped before `commit` rolls back, leaving any previous table in place.
pub struct SqliteSink {
    conn: SqliteConnection,
    insert_sql: Option<String>,
    in_transaction: bool,
}

impl SqliteSink {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = establish_connection(db_path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: SqliteConnection) -> Self {
        SqliteSink {
            conn,
            insert_sql: None,
            in_transaction: false,
        }
    }
}

impl VerseSink for SqliteSink {
    fn create_table(&mut self, table_name: &str) -> Result<()> {
        validate_table_name(table_name)?;

        if !self.in_transaction {
            AnsiTransactionManager::begin_transaction(&mut self.conn)
                .context("Failed to begin transaction")?;
            self.in_transaction = true;
        }

        sql_query(format!("DROP TABLE IF EXISTS {}", table_name))
            .execute(&mut self.conn)
            .with_context(|| format!("Failed to drop table: {}", table_name))?;

        sql_query(create_table_sql(table_name))
            .execute(&mut self.conn)
            .with_context(|| format!("Failed to create table: {}", table_name))?;

        self.insert_sql = Some(format!(
            "INSERT INTO {} (work, book, chapter, verse, scripture) VALUES (?, ?, ?, ?, ?)",
            table_name
        ));
        Ok(())
    }

    fn insert(&mut self, record: &VerseRecord<'_>) -> Result<()> {
        let insert_sql = self
            .insert_sql
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("insert() called before create_table()"))?;

        sql_query(insert_sql)
            .bind::<Text, _>(record.work)
            .bind::<Text, _>(record.book)
            .bind::<BigInt, _>(record.chapter)
            .bind::<BigInt, _>(i64::from(record.verse))
            .bind::<Text, _>(record.text)
            .execute(&mut self.conn)
            .with_context(|| {
                format!(
                    "Failed to insert verse: {} {} {}:{}",
                    record.work, record.book, record.chapter, record.verse
                )
            })?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            AnsiTransactionManager::commit_transaction(&mut self.conn)
                .context("Failed to commit transaction")?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

impl Drop for SqliteSink {
    fn drop(&mut self) {
        if self.in_transaction {
            if let Err(e) = AnsiTransactionManager::rollback_transaction(&mut self.conn) {
                tracing::error!("Failed to roll back uncommitted verses: {}", e);
            }
        }
    }
}

/// All rows of `table_name`, in id order.
pub fn load_verses(db_path: &Path, table_name: &str) -> Result<Vec<ScriptureRow>> {
    validate_table_name(table_name)?;
    let mut conn = establish_connection(db_path)?;

    sql_query(format!(
        "SELECT id, work, book, chapter, verse, scripture FROM {} ORDER BY id",
        table_name
    ))
    .load::<ScriptureRow>(&mut conn)
    .with_context(|| format!("Failed to read table: {}", table_name))
}

/// Number of stored verses per work, in the order the works were inserted.
pub fn verse_counts_by_work(db_path: &Path, table_name: &str) -> Result<Vec<WorkVerseCount>> {
    validate_table_name(table_name)?;
    let mut conn = establish_connection(db_path)?;

    sql_query(format!(
        "SELECT work, COUNT(*) AS verse_count FROM {} GROUP BY work ORDER BY MIN(id)",
        table_name
    ))
    .load::<WorkVerseCount>(&mut conn)
    .with_context(|| format!("Failed to count verses in table: {}", table_name))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::sink::store_corpus;
    use crate::types::{Book, Corpus, Verse, Work};

    fn small_corpus(text: &str) -> Corpus {
        let mut book = Book::new("Moroni");
        book.chapter_mut(1).insert_verse(Verse { number: 1, text: text.to_string() });
        book.chapter_mut(1).insert_verse(Verse { number: 2, text: "World".to_string() });
        let mut work = Work::new("bom");
        work.insert_book(book);
        let mut corpus = Corpus::new();
        corpus.insert_work(work);
        corpus
    }

    #[test]
    fn test_store_and_load() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("scriptures.db");

        let mut sink = SqliteSink::open(&db_path).unwrap();
        let n = store_corpus(&small_corpus("Hello"), &mut sink, "scriptures").unwrap();
        drop(sink);
        assert_eq!(n, 2);

        let rows = load_verses(&db_path, "scriptures").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].work, "bom");
        assert_eq!(rows[0].book, "Moroni");
        assert_eq!(rows[0].chapter, 1);
        assert_eq!(rows[0].verse, 1);
        assert_eq!(rows[0].scripture, "Hello");
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].scripture, "World");

        let counts = verse_counts_by_work(&db_path, "scriptures").unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].work, "bom");
        assert_eq!(counts[0].verse_count, 2);
    }

    #[test]
    fn test_recreate_replaces_rows() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("scriptures.db");

        let mut sink = SqliteSink::open(&db_path).unwrap();
        store_corpus(&small_corpus("first run"), &mut sink, "scriptures").unwrap();
        store_corpus(&small_corpus("second run"), &mut sink, "scriptures").unwrap();
        drop(sink);

        let rows = load_verses(&db_path, "scriptures").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scripture, "second run");
    }

    #[test]
    fn test_uncommitted_run_rolls_back() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("scriptures.db");

        let mut sink = SqliteSink::open(&db_path).unwrap();
        store_corpus(&small_corpus("kept"), &mut sink, "scriptures").unwrap();
        drop(sink);

        let mut sink = SqliteSink::open(&db_path).unwrap();
        sink.create_table("scriptures").unwrap();
        let record = VerseRecord { work: "w", book: "b", chapter: 9, verse: 9, text: "lost" };
        sink.insert(&record).unwrap();
        drop(sink);

        let rows = load_verses(&db_path, "scriptures").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scripture, "kept");
    }

    #[test]
    fn test_rejects_bad_table_name() {
        let dir = TempDir::new().unwrap();
        let mut sink = SqliteSink::open(&dir.path().join("x.db")).unwrap();
        assert!(sink.create_table("scriptures; DROP TABLE x").is_err());
        assert!(sink.insert(&VerseRecord { work: "w", book: "b", chapter: 1, verse: 1, text: "t" }).is_err());
    }
}
