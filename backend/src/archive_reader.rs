//! Streaming access to the text entries of an in-memory zip archive.
//!
//! Entries are visited one at a time with [`ArchiveReader::next_entry`]. Each
//! [`ArchiveEntry`] borrows the reader, so an entry's lines have to be consumed
//! (or the entry dropped) before the next entry can be opened. A member is only
//! decompressed once its lines are requested. Consuming an entry's
//! [`EntryLines`] exhausts it. To read the archive again, open it again.

use std::io::{self, BufRead, BufReader, Cursor};

use zip::ZipArchive;

use crate::error::{CorpusError, Location};

/// Identifies the archive member a line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHandle {
    pub index: usize,
    pub name: String,
}

impl EntryHandle {
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

pub struct ArchiveReader {
    label: String,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    next_index: usize,
}

impl ArchiveReader {
    /// `label` names the archive in error messages, e.g. the locator it was fetched from.
    pub fn open(label: &str, bytes: Vec<u8>) -> Result<Self, CorpusError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| CorpusError::ArchiveCorrupt {
            archive: label.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Opened archive {} with {} entries", label, archive.len());

        Ok(ArchiveReader {
            label: label.to_string(),
            archive,
            next_index: 0,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// The next member in central directory order, or `None` after the last one.
    ///
    /// Only the member's name is read here. Its data is decompressed when
    /// [`ArchiveEntry::lines`] is called, so members that are never read can't
    /// fail.
    pub fn next_entry(&mut self) -> Option<Result<ArchiveEntry<'_>, CorpusError>> {
        if self.next_index >= self.archive.len() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;

        let name = match self.archive.name_for_index(index) {
            Some(name) => name.to_string(),
            None => {
                return Some(Err(CorpusError::EntryUnreadable {
                    location: Location::new(&self.label, &format!("#{}", index)),
                    reason: "entry missing from the central directory".to_string(),
                }));
            }
        };

        Some(Ok(ArchiveEntry {
            location: Location::new(&self.label, &name),
            handle: EntryHandle { index, name },
            archive: &mut self.archive,
        }))
    }
}

pub struct ArchiveEntry<'a> {
    handle: EntryHandle,
    location: Location,
    archive: &'a mut ZipArchive<Cursor<Vec<u8>>>,
}

impl<'a> ArchiveEntry<'a> {
    pub fn handle(&self) -> &EntryHandle {
        &self.handle
    }

    pub fn name(&self) -> &str {
        &self.handle.name
    }

    /// Opens the member for reading. Fails with `EntryUnreadable` if it
    /// can't be decompressed, e.g. an unsupported compression method.
    pub fn lines(self) -> Result<EntryLines<'a>, CorpusError> {
        let location = self.location;
        let file = self
            .archive
            .by_index(self.handle.index)
            .map_err(|e| CorpusError::EntryUnreadable {
                location: location.clone(),
                reason: e.to_string(),
            })?;

        Ok(EntryLines {
            reader: Box::new(BufReader::new(file)),
            location,
            buf: Vec::new(),
            after_cr: false,
            done: false,
        })
    }
}

/// Non-blank lines of one entry, with the line terminator removed.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Nothing else is trimmed.
/// After the first error the iterator is fused.
pub struct EntryLines<'a> {
    reader: Box<dyn BufRead + 'a>,
    location: Location,
    buf: Vec<u8>,
    after_cr: bool,
    done: bool,
}

impl EntryLines<'_> {
    fn unreadable(&mut self, reason: String) -> CorpusError {
        self.done = true;
        CorpusError::EntryUnreadable {
            location: self.location.clone(),
            reason,
        }
    }

    /// Reads up to the next terminator into `buf`. `false` at end of input.
    fn read_line(&mut self) -> io::Result<bool> {
        self.buf.clear();
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(!self.buf.is_empty());
            }

            // The `\n` of a `\r\n` pair split across two reads.
            if self.after_cr {
                self.after_cr = false;
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    let cr = available[i] == b'\r';
                    self.buf.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    self.after_cr = cr;
                    return Ok(true);
                }
                None => {
                    let n = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(n);
                }
            }
        }
    }
}

impl Iterator for EntryLines<'_> {
    type Item = Result<String, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => return Some(Err(self.unreadable(e.to_string()))),
            }
            if self.buf.is_empty() {
                continue;
            }

            let bytes = std::mem::take(&mut self.buf);
            return match String::from_utf8(bytes) {
                Ok(line) => Some(Ok(line)),
                Err(e) => Some(Err(self.unreadable(format!("invalid UTF-8: {}", e)))),
            };
        }
        None
    }
}
