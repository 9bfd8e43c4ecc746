use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

/// A row of a scriptures table, read back in id order.
#[derive(Debug, Clone, QueryableByName, PartialEq, Eq)]
pub struct ScriptureRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub work: String,
    #[diesel(sql_type = Text)]
    pub book: String,
    #[diesel(sql_type = BigInt)]
    pub chapter: i64,
    #[diesel(sql_type = BigInt)]
    pub verse: i64,
    #[diesel(sql_type = Text)]
    pub scripture: String,
}

#[derive(Debug, Clone, QueryableByName, PartialEq, Eq)]
pub struct WorkVerseCount {
    #[diesel(sql_type = Text)]
    pub work: String,
    #[diesel(sql_type = BigInt)]
    pub verse_count: i64,
}
