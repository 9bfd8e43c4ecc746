use anyhow::Result;

use crate::error::CorpusError;
use crate::sink::{store_corpus, VerseSink};
use crate::source::ArchiveSource;
use crate::types::Corpus;
use crate::work_builder::build_work;

impl Corpus {
    /// Builds a corpus from `(label, zip bytes)` pairs, one work per archive.
    ///
    /// Archives are processed in order, each one completely before the next.
    /// The first error stops the run and no corpus is returned.
    pub fn from_archives<I, L>(archives: I) -> Result<Corpus, CorpusError>
    where
        I: IntoIterator<Item = (L, Vec<u8>)>,
        L: AsRef<str>,
    {
        let mut corpus = Corpus::new();
        for (label, bytes) in archives {
            let work = build_work(label.as_ref(), bytes)?;
            corpus.insert_work(work);
        }
        Ok(corpus)
    }
}

pub struct CorpusBuilder<'a, S: ArchiveSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ArchiveSource + ?Sized> CorpusBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        CorpusBuilder { source }
    }

    /// Fetches and aggregates each locator in turn. A later work with the same
    /// name replaces an earlier one.
    pub fn build(&self, locators: &[String]) -> Result<Corpus, CorpusError> {
        let mut corpus = Corpus::new();

        for locator in locators {
            let bytes = self.source.fetch(locator)?;
            let work = build_work(locator, bytes)?;

            if corpus.works.contains_key(&work.name) {
                tracing::warn!("Work {} from {} replaces an earlier archive", work.name, locator);
            }
            corpus.insert_work(work);
        }

        tracing::info!(
            "Corpus complete: {} works, {} verses",
            corpus.works.len(),
            corpus.verse_count()
        );
        Ok(corpus)
    }

    /// Builds the corpus and writes it to `sink`. Returns the number of rows.
    pub fn build_and_store<K: VerseSink + ?Sized>(
        &self,
        locators: &[String],
        sink: &mut K,
        table_name: &str,
    ) -> Result<usize> {
        let corpus = self.build(locators)?;
        store_corpus(&corpus, sink, table_name)
    }
}
