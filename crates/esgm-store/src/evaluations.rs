//! Stored evaluations and pillar scores.

use chrono::Utc;
use esgm_core::{
    Evaluation, EvaluationId, EvaluationOutcome, Pillar, PillarScore, ProjectId, ProjectStatus,
};
use esgm_eval::{AnswerInput, EvaluationInput};
use rusqlite::{Connection, OptionalExtension, params};

use crate::db::parse_column;
use crate::{Error, Result, Store};

pub(crate) fn pillar_scores_for(
    conn: &Connection,
    evaluation_id: EvaluationId,
) -> rusqlite::Result<Vec<PillarScore>> {
    let mut stmt = conn.prepare(
        "SELECT score_id, pillar_type, score, weight, pass_status, key_count,
                total_weight, weighted_sum, evaluation_id, standard_id
         FROM pillar_scores
         WHERE evaluation_id = ?1
         ORDER BY CASE pillar_type WHEN 'E' THEN 0 WHEN 'S' THEN 1 ELSE 2 END",
    )?;
    let scores = stmt
        .query_map(params![evaluation_id], |row| {
            Ok(PillarScore {
                score_id: row.get("score_id")?,
                pillar_type: parse_column::<Pillar>(row, "pillar_type")?,
                score: row.get("score")?,
                weight: row.get("weight")?,
                pass_status: row.get("pass_status")?,
                key_count: row.get("key_count")?,
                total_weight: row.get("total_weight")?,
                weighted_sum: row.get("weighted_sum")?,
                evaluation_id: row.get("evaluation_id")?,
                standard_id: row.get("standard_id")?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(scores)
}

impl Store {
    /// A project's answers joined with their key issues, or `None` if the
    /// project is gone.
    pub async fn evaluation_input(&self, project_id: ProjectId) -> Result<Option<EvaluationInput>> {
        self.call(move |conn| {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM projects WHERE project_id = ?1",
                    params![project_id],
                    |_| Ok(()),
                )
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }

            let mut stmt = conn.prepare(
                "SELECT pd.issue_id, ki.pillar, ki.msci_weight, ki.standard_id, pd.value
                 FROM project_data pd
                 JOIN key_issue ki ON pd.issue_id = ki.issue_id
                 WHERE pd.project_id = ?1
                 ORDER BY pd.data_id",
            )?;
            let answers = stmt
                .query_map(params![project_id], |row| {
                    Ok(AnswerInput {
                        issue_id: row.get("issue_id")?,
                        pillar: parse_column::<Pillar>(row, "pillar")?,
                        msci_weight: row.get("msci_weight")?,
                        standard_id: row.get("standard_id")?,
                        value: row.get("value")?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Some(EvaluationInput {
                project_id,
                answers,
            }))
        })
        .await
    }

    /// Store `outcome` as the project's evaluation and mark the project
    /// `COMPLETED`.
    ///
    /// Any earlier evaluation and its pillar scores are replaced. Runs in
    /// one transaction; a deleted project fails with
    /// [`Error::InvalidReference`].
    pub async fn save_evaluation(
        &self,
        project_id: ProjectId,
        outcome: &EvaluationOutcome,
    ) -> Result<Evaluation> {
        let outcome = outcome.clone();
        self.call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM evaluations WHERE project_id = ?1",
                params![project_id],
            )?;
            tx.execute(
                "INSERT INTO evaluations (project_id, overall_score, status, evaluated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    project_id,
                    outcome.overall_score,
                    outcome.status.as_str(),
                    Utc::now()
                ],
            )
            .map_err(|e| Error::from_write(e, &format!("project {project_id}")))?;
            let evaluation_id = tx.last_insert_rowid();

            let mut pillar_scores = Vec::with_capacity(outcome.pillar_scores.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO pillar_scores (evaluation_id, pillar_type, score, weight,
                                                pass_status, key_count, total_weight,
                                                weighted_sum, standard_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for result in &outcome.pillar_scores {
                    stmt.execute(params![
                        evaluation_id,
                        result.pillar.as_str(),
                        result.score,
                        result.weight,
                        result.pass_status,
                        result.key_count,
                        result.total_weight,
                        result.weighted_sum,
                        result.standard_id,
                    ])
                    .map_err(|e| {
                        Error::from_write(e, &format!("standard {}", result.standard_id))
                    })?;
                    pillar_scores.push(PillarScore {
                        score_id: tx.last_insert_rowid(),
                        pillar_type: result.pillar,
                        score: result.score,
                        weight: result.weight,
                        pass_status: result.pass_status,
                        key_count: result.key_count,
                        total_weight: result.total_weight,
                        weighted_sum: result.weighted_sum,
                        evaluation_id,
                        standard_id: result.standard_id,
                    });
                }
            }

            tx.execute(
                "UPDATE projects SET status = ?1 WHERE project_id = ?2",
                params![ProjectStatus::Completed.as_str(), project_id],
            )?;
            tx.commit()?;

            tracing::info!(
                project_id,
                evaluation_id,
                overall_score = outcome.overall_score,
                status = %outcome.status,
                "Saved evaluation"
            );
            Ok(Evaluation {
                evaluation_id,
                overall_score: outcome.overall_score,
                status: outcome.status,
                project_id,
                pillar_scores,
            })
        })
        .await
    }
}
