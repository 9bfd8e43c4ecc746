use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds a zip archive in memory with the given `(name, content)` entries, in order.
pub fn make_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            continue;
        }
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[allow(dead_code)]
pub const BOM_CONTENTS: &str = "\
THE BOOK OF MORMON

Contents

1 Nephi . . . . . . . . . . 1 Ne
Moroni . . . . Moro
";

/// A small Pearl of Great Price style archive with lettered front matter.
#[allow(dead_code)]
pub fn pofgp_archive() -> Vec<u8> {
    make_archive(&[
        ("pofgp/", ""),
        ("pofgp/Readme.txt", "Readme for the archive, not verses"),
        ("pofgp/Contents.txt", "Moses . . . . Moses\nJoseph Smith History . . . . JS-H\n"),
        ("pofgp/Moses.txt", "Moses 1:1 The words of God\nMoses 1:2 And he saw God\n\nMoses 2:1 And again\n"),
        ("pofgp/Facsimile1.txt", "not a verse line at all"),
        ("pofgp/JS-H.txt", "JS-H 1:1 Owing to the many reports\nJS-H A:1 Note one\nJS-H A:2 Note two\nJS-H B:1 Note three\n"),
    ])
}

/// Rewrites the compression method recorded for `entry` in both its local
/// header and its central directory record.
#[allow(dead_code)]
pub fn set_compression_method(mut bytes: Vec<u8>, entry: &str, method: u16) -> Vec<u8> {
    let name = entry.as_bytes();
    let read_u16 = |b: &[u8], at: usize| u16::from_le_bytes([b[at], b[at + 1]]) as usize;

    let mut i = 0;
    while i + 4 <= bytes.len() {
        // (method offset, name length offset, name offset)
        let (method_at, name_len_at, name_at) = match &bytes[i..i + 4] {
            b"PK\x03\x04" => (8, 26, 30),
            b"PK\x01\x02" => (10, 28, 46),
            _ => {
                i += 1;
                continue;
            }
        };
        if i + name_at <= bytes.len() {
            let len = read_u16(&bytes, i + name_len_at);
            if bytes.get(i + name_at..i + name_at + len) == Some(name) {
                bytes[i + method_at..i + method_at + 2].copy_from_slice(&method.to_le_bytes());
            }
        }
        i += 4;
    }
    bytes
}
