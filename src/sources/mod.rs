// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The `sources` table and the "first activated record wins" selection rule.

mod sqlite;

pub use sqlite::SqliteSourceRepository;

use crate::errors::SourceError;

/// Query issued against the configured connection.
pub const SOURCES_QUERY: &str = "SELECT * FROM sources";

/// One row of the `sources` table: identifier first, `activated` flag second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub id: String,
    pub activated: bool,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, activated: bool) -> Self {
        Self {
            id: id.into(),
            activated,
        }
    }
}

/// Returns the first record whose `activated` flag is set, in iteration order.
pub fn select_activated_source(rows: &[SourceRecord]) -> Option<&SourceRecord> {
    rows.iter().find(|row| row.activated)
}

/// Anything that can produce the rows of the `sources` table.
///
/// Implementations are blocking; async callers run them on the blocking pool.
pub trait SourceRepository: Send + Sync {
    fn fetch_sources(&self) -> Result<Vec<SourceRecord>, SourceError>;
}
