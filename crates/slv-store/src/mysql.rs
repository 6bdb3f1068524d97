//! MySQL event source backed by an `sqlx` pool.

use std::time::Instant;

use chrono::{DateTime, NaiveDateTime, Utc};
use slv_core::{Connection, EventRow, QueryPlan, SchemaMap};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow},
    Row,
};

use crate::{statement::select_statement, EventSource, StoreError};

/// Reads events from the rsyslog MySQL sink.
pub struct MySqlSource {
    pool: MySqlPool,
    schema: SchemaMap,
}

impl MySqlSource {
    /// Open a single-connection pool. Reads are strictly sequential.
    pub async fn connect(connection: &Connection, schema: SchemaMap) -> Result<Self, StoreError> {
        let options = MySqlConnectOptions::new()
            .host(&connection.host)
            .port(connection.port)
            .username(&connection.user)
            .password(&connection.password)
            .database(&connection.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|source| StoreError::Connect {
                target: connection.to_string(),
                source,
            })?;

        tracing::info!(target_db = %connection, "connected");
        Ok(Self { pool, schema })
    }

    fn decode(&self, row: &MySqlRow) -> Result<EventRow, StoreError> {
        let s = &self.schema;
        Ok(EventRow {
            id: int_at(row, 0, &s.id)?,
            reported_at: timestamp_at(row, 1, &s.timestamp)?,
            facility: int_at(row, 2, &s.facility)?,
            priority: int_at(row, 3, &s.priority)?,
            from_host: text_at(row, 4, &s.host)?,
            tag: text_at(row, 5, &s.tag)?,
            message: text_at(row, 6, &s.message)?,
        })
    }
}

impl EventSource for MySqlSource {
    async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<EventRow>, StoreError> {
        let sql = select_statement(&self.schema, plan);
        let started = Instant::now();
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        tracing::debug!(
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            %sql,
            "query executed"
        );
        rows.iter().map(|row| self.decode(row)).collect()
    }
}

// ---------------------------------------------------------------------------
// Column decoding
// ---------------------------------------------------------------------------

// rsyslog declares ids unsigned and facility/priority as smallint, so try
// signed first and fall back to unsigned.
fn int_at(row: &MySqlRow, idx: usize, column: &str) -> Result<i64, StoreError> {
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(v);
    }
    match row.try_get::<u64, _>(idx) {
        Ok(v) => Ok(i64::try_from(v).unwrap_or(i64::MAX)),
        Err(source) => Err(decode_error(column, source)),
    }
}

fn timestamp_at(row: &MySqlRow, idx: usize, column: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
        return Ok(v.and_utc());
    }
    row.try_get::<DateTime<Utc>, _>(idx)
        .map_err(|source| decode_error(column, source))
}

/// NULL reads as empty; binary columns are decoded lossily.
fn text_at(row: &MySqlRow, idx: usize, column: &str) -> Result<String, StoreError> {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v.unwrap_or_default());
    }
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .map(|v| String::from_utf8_lossy(&v.unwrap_or_default()).into_owned())
        .map_err(|source| decode_error(column, source))
}

fn decode_error(column: &str, source: sqlx::Error) -> StoreError {
    StoreError::Decode {
        column: column.to_string(),
        source,
    }
}
