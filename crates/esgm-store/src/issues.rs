//! Key issue reference data.

use esgm_core::{IssueId, KeyIssue, Pillar};
use rusqlite::{Row, params};
use serde_json::Value;

use crate::db::parse_column;
use crate::{Result, Store};

fn key_issue_from_row(row: &Row<'_>) -> rusqlite::Result<KeyIssue> {
    let criteria: Option<Value> = row.get("criteria")?;
    let benchmark: Option<Value> = row.get("benchmark")?;
    Ok(KeyIssue::new(
        row.get("issue_id")?,
        row.get::<_, String>("name")?,
        parse_column::<Pillar>(row, "pillar")?,
        row.get("description")?,
        row.get("msci_weight")?,
        row.get("standard_id")?,
        criteria.unwrap_or(Value::Null),
        benchmark.unwrap_or(Value::Null),
    ))
}

impl Store {
    /// All key issues, E then S then G, by id within a pillar.
    ///
    /// This is the form's pillar order, not the alphabetical E, G, S a plain
    /// sort on the `pillar` column would give. A key issue without its own
    /// criteria inherits its standard's.
    pub async fn key_issues(&self) -> Result<Vec<KeyIssue>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT ki.issue_id, ki.name, ki.pillar, ki.description, ki.msci_weight,
                        ki.standard_id, COALESCE(ki.criteria, ms.criteria) AS criteria,
                        ms.benchmark
                 FROM key_issue ki
                 JOIN msci_standard ms ON ki.standard_id = ms.standard_id
                 ORDER BY CASE ki.pillar WHEN 'E' THEN 0 WHEN 'S' THEN 1 ELSE 2 END,
                          ki.issue_id",
            )?;
            let issues = stmt
                .query_map([], key_issue_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(issues)
        })
        .await
    }

    /// The first id in `issue_ids` with no key issue, if any.
    pub async fn first_unknown_issue(&self, issue_ids: &[IssueId]) -> Result<Option<IssueId>> {
        let issue_ids = issue_ids.to_vec();
        self.call(move |conn| {
            let mut stmt = conn.prepare("SELECT 1 FROM key_issue WHERE issue_id = ?1")?;
            for id in issue_ids {
                if !stmt.exists(params![id])? {
                    return Ok(Some(id));
                }
            }
            Ok(None)
        })
        .await
    }
}
