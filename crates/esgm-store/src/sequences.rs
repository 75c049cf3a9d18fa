//! Autoincrement sequence maintenance for development databases.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{Result, Store};

/// Tables with an autoincrement key, and that key.
const SEQUENCED: &[(&str, &str)] = &[
    ("users", "user_id"),
    ("msci_standard", "standard_id"),
    ("key_issue", "issue_id"),
    ("projects", "project_id"),
    ("project_data", "data_id"),
    ("evaluations", "evaluation_id"),
    ("pillar_scores", "score_id"),
];

/// Sequence state of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceInfo {
    /// Table name
    pub table_name: String,
    /// Last value handed out by the sequence (0 if never used)
    pub current_value: i64,
    /// Largest key currently in the table (0 if empty)
    pub max_id: i64,
}

fn read_info(conn: &Connection) -> rusqlite::Result<Vec<SequenceInfo>> {
    SEQUENCED
        .iter()
        .map(|(table, key)| {
            let current_value = conn
                .query_row(
                    "SELECT seq FROM sqlite_sequence WHERE name = ?1",
                    params![table],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?
                .unwrap_or(0);
            let max_id = conn.query_row(
                &format!("SELECT COALESCE(MAX({key}), 0) FROM {table}"),
                [],
                |row| row.get::<_, i64>(0),
            )?;
            Ok(SequenceInfo {
                table_name: (*table).to_string(),
                current_value,
                max_id,
            })
        })
        .collect()
}

impl Store {
    /// Current sequence value and max key of every table.
    pub async fn sequence_info(&self) -> Result<Vec<SequenceInfo>> {
        self.call(|conn| Ok(read_info(conn)?)).await
    }

    /// Rewind every sequence to its table's max key, so the next insert
    /// reuses the ids freed by deletes. Returns the new state.
    pub async fn reset_sequences(&self) -> Result<Vec<SequenceInfo>> {
        self.call(|conn| {
            let tx = conn.transaction()?;
            for (table, key) in SEQUENCED {
                let max_id: i64 = tx.query_row(
                    &format!("SELECT COALESCE(MAX({key}), 0) FROM {table}"),
                    [],
                    |row| row.get(0),
                )?;
                tx.execute("DELETE FROM sqlite_sequence WHERE name = ?1", params![table])?;
                tx.execute(
                    "INSERT INTO sqlite_sequence (name, seq) VALUES (?1, ?2)",
                    params![table, max_id],
                )?;
            }
            let info = read_info(&tx)?;
            tx.commit()?;
            tracing::warn!("Reset all autoincrement sequences");
            Ok(info)
        })
        .await
    }
}
