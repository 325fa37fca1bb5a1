use crate::errors::StoreError;
use crate::models::{ActivityInput, ActivityRecord, Diet, TrainingType};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{
    Connection, OptionalExtension, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, info};

const SCHEMA_VERSION: i64 = 1;

const RECORD_COLUMNS: &str = "id, date, training_type, diet, created_at, updated_at";

/// Date-keyed activity records in a single SQLite table.
///
/// One connection guarded by a mutex gives a single serialized writer; the
/// `UNIQUE(date)` constraint keeps concurrent upserts on one row.
pub struct ActivityStore {
    conn: Mutex<Connection>,
}

impl ActivityStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        let store = Self::from_connection(conn)?;
        info!("activity store opened at {} (journal_mode={mode})", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Flushes and releases the connection.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = self.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, err)| StoreError::Sqlite(err))?;
        info!("activity store closed");
        Ok(())
    }

    pub fn get(&self, date: NaiveDate) -> Result<Option<ActivityRecord>, StoreError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM activities WHERE date = ?1"),
                params![date],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Records ordered by date. Either bound may be omitted; both are inclusive.
    pub fn list(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<ActivityRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {RECORD_COLUMNS} FROM activities
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date ASC"
        ))?;
        let records = stmt
            .query_map(params![start, end], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn upsert(
        &self,
        date: NaiveDate,
        input: &ActivityInput,
    ) -> Result<ActivityRecord, StoreError> {
        self.upsert_at(date, input, Utc::now())
    }

    /// Inserts the day or replaces both fields of the existing row.
    ///
    /// Unspecified fields reset to their defaults; `created_at` is kept on
    /// update and `updated_at` is set to `now`.
    pub fn upsert_at(
        &self,
        date: NaiveDate,
        input: &ActivityInput,
        now: DateTime<Utc>,
    ) -> Result<ActivityRecord, StoreError> {
        let training_type = input.training_type.unwrap_or_default();
        let conn = self.lock()?;
        let record = conn.query_row(
            &format!(
                "INSERT INTO activities (date, training_type, diet, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(date) DO UPDATE SET
                     training_type = excluded.training_type,
                     diet = excluded.diet,
                     updated_at = excluded.updated_at
                 RETURNING {RECORD_COLUMNS}"
            ),
            params![date, training_type, input.diet, now],
            record_from_row,
        )?;
        debug!(
            "upserted {date}: training_type={} diet={:?}",
            record.training_type, record.diet
        );
        Ok(record)
    }

    /// Returns whether a row existed.
    pub fn delete(&self, date: NaiveDate) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM activities WHERE date = ?1", params![date])?;
        debug!("delete {date}: removed={removed}");
        Ok(removed > 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version < 1 {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                training_type TEXT NOT NULL DEFAULT 'none'
                    CHECK (training_type IN ('physical', 'cardio', 'none')),
                diet TEXT DEFAULT NULL CHECK (diet IN ('good', 'bad')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date);",
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!("activity store schema migrated to version {SCHEMA_VERSION}");
    }
    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ActivityRecord> {
    Ok(ActivityRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        training_type: row.get(2)?,
        diet: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl ToSql for TrainingType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TrainingType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

impl ToSql for Diet {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Diet {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}
