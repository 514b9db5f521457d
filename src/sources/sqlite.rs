// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rusqlite::{params, types::Value as SqlValue, Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;

use crate::errors::SourceError;
use crate::sources::{SourceRecord, SourceRepository, SOURCES_QUERY};

/// `sources` table stored in a SQLite database.
///
/// The connection sits behind a `Mutex` so one repository can be shared between
/// task attempts; `rusqlite::Connection` itself is not `Sync`.
pub struct SqliteSourceRepository {
    conn: Mutex<Connection>,
}

impl SqliteSourceRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path)?),
        })
    }

    /// Open an existing database read-only; a missing file is an error, not a new database.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Self {
            conn: Mutex::new(Connection::open_with_flags(path, flags)?),
        })
    }

    pub fn open_in_memory() -> Result<Self, SourceError> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// Create the table if needed and insert `records` in order, in one transaction.
    pub fn seed(&self, records: &[SourceRecord]) -> Result<(), SourceError> {
        let mut conn = self.conn.lock().map_err(|_| SourceError::LockPoisoned)?;
        let tx = conn.transaction()?;
        tx.execute(
            "CREATE TABLE IF NOT EXISTS sources (name TEXT NOT NULL, activated INTEGER NOT NULL)",
            [],
        )?;
        for record in records {
            tx.execute(
                "INSERT INTO sources (name, activated) VALUES (?1, ?2)",
                params![record.id, record.activated],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl SourceRepository for SqliteSourceRepository {
    fn fetch_sources(&self) -> Result<Vec<SourceRecord>, SourceError> {
        let conn = self.conn.lock().map_err(|_| SourceError::LockPoisoned)?;
        let mut stmt = conn.prepare(SOURCES_QUERY)?;
        if stmt.column_count() < 2 {
            return Err(SourceError::UnsupportedValue {
                column: "activated",
                reason: format!(
                    "expected at least 2 columns in 'sources', found {}",
                    stmt.column_count()
                ),
            });
        }

        let raw_rows: Vec<(SqlValue, SqlValue)> = stmt
            .query_map([], |row| Ok((row.get::<_, SqlValue>(0)?, row.get::<_, SqlValue>(1)?)))?
            .collect::<Result<_, _>>()?;

        raw_rows
            .into_iter()
            .map(|(id, activated)| {
                Ok(SourceRecord {
                    id: identifier_from_sql(id)?,
                    activated: flag_from_sql(activated)?,
                })
            })
            .collect()
    }
}

fn identifier_from_sql(value: SqlValue) -> Result<String, SourceError> {
    match value {
        SqlValue::Text(s) => Ok(s),
        SqlValue::Integer(i) => Ok(i.to_string()),
        SqlValue::Real(f) => Ok(f.to_string()),
        SqlValue::Null => Err(SourceError::UnsupportedValue {
            column: "id",
            reason: "identifier is NULL".to_string(),
        }),
        SqlValue::Blob(b) => Err(SourceError::UnsupportedValue {
            column: "id",
            reason: format!("<blob {} bytes>", b.len()),
        }),
    }
}

/// MySQL-style booleans: any non-zero number is true, NULL is false.
fn flag_from_sql(value: SqlValue) -> Result<bool, SourceError> {
    match value {
        SqlValue::Null => Ok(false),
        SqlValue::Integer(i) => Ok(i != 0),
        SqlValue::Real(f) => Ok(f != 0.0),
        SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(SourceError::UnsupportedValue {
                column: "activated",
                reason: format!("'{}' is not a boolean", other),
            }),
        },
        SqlValue::Blob(b) => Err(SourceError::UnsupportedValue {
            column: "activated",
            reason: format!("<blob {} bytes>", b.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::select_activated_source;

    #[test]
    fn test_fetch_seeded_rows_in_order() {
        let repo = SqliteSourceRepository::open_in_memory().unwrap();
        repo.seed(&[
            SourceRecord::new("twitter", false),
            SourceRecord::new("reddit", true),
            SourceRecord::new("rss", true),
        ])
        .unwrap();

        let rows = repo.fetch_sources().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], SourceRecord::new("twitter", false));
        assert_eq!(select_activated_source(&rows).unwrap().id, "reddit");
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let repo = SqliteSourceRepository::open_in_memory().unwrap();
        assert!(matches!(
            repo.fetch_sources(),
            Err(SourceError::Database(_))
        ));
    }

    #[test]
    fn test_integer_ids_and_tinyint_flags() {
        let repo = SqliteSourceRepository::open_in_memory().unwrap();
        {
            let conn = repo.conn.lock().unwrap();
            conn.execute_batch(
                "CREATE TABLE sources (id INTEGER, activated TINYINT, label TEXT);
                 INSERT INTO sources VALUES (10, 0, 'a');
                 INSERT INTO sources VALUES (11, NULL, 'b');
                 INSERT INTO sources VALUES (12, 2, 'c');",
            )
            .unwrap();
        }

        let rows = repo.fetch_sources().unwrap();
        assert_eq!(
            rows,
            vec![
                SourceRecord::new("10", false),
                SourceRecord::new("11", false),
                SourceRecord::new("12", true),
            ]
        );
    }

    #[test]
    fn test_single_column_table_is_rejected() {
        let repo = SqliteSourceRepository::open_in_memory().unwrap();
        {
            let conn = repo.conn.lock().unwrap();
            conn.execute_batch("CREATE TABLE sources (name TEXT);").unwrap();
        }

        assert!(matches!(
            repo.fetch_sources(),
            Err(SourceError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.db");

        SqliteSourceRepository::open(&path)
            .unwrap()
            .seed(&[SourceRecord::new("s3", true)])
            .unwrap();

        let reopened = SqliteSourceRepository::open_existing(&path).unwrap();
        assert_eq!(reopened.fetch_sources().unwrap(), vec![SourceRecord::new("s3", true)]);
    }

    #[test]
    fn test_open_existing_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");

        assert!(matches!(
            SqliteSourceRepository::open_existing(&path),
            Err(SourceError::Database(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_existing_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.db");
        SqliteSourceRepository::open(&path).unwrap().seed(&[]).unwrap();

        let repo = SqliteSourceRepository::open_existing(&path).unwrap();
        assert!(matches!(
            repo.seed(&[SourceRecord::new("s3", true)]),
            Err(SourceError::Database(_))
        ));
    }
}
