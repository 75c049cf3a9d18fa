//! Projects and their answers.

use chrono::Utc;
use esgm_core::{
    CreateProjectRequest, Evaluation, EvaluationStatus, Pillar, Project, ProjectAnswer, ProjectId,
    ProjectStats, ProjectStatus, ProjectWithEvaluation, UserId,
};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::db::parse_column;
use crate::evaluations::pillar_scores_for;
use crate::{Error, Result, Store};

const PROJECT_WITH_EVALUATION: &str = "
    SELECT p.project_id, p.project_name, p.submitted_at, p.industry, p.annual_revenue,
           p.status, p.description, p.user_id,
           e.evaluation_id, e.overall_score, e.status AS evaluation_status
    FROM projects p
    LEFT JOIN evaluations e ON e.project_id = p.project_id";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        project_id: row.get("project_id")?,
        project_name: row.get("project_name")?,
        submitted_at: row.get("submitted_at")?,
        industry: row.get("industry")?,
        annual_revenue: row.get("annual_revenue")?,
        status: parse_column::<ProjectStatus>(row, "status")?,
        description: row.get("description")?,
        user_id: row.get("user_id")?,
    })
}

/// Project row plus the evaluation summary (no pillar scores).
fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectWithEvaluation> {
    let project = project_from_row(row)?;
    let evaluation = match row.get::<_, Option<i64>>("evaluation_id")? {
        Some(evaluation_id) => Some(Evaluation {
            evaluation_id,
            overall_score: row.get("overall_score")?,
            status: parse_column::<EvaluationStatus>(row, "evaluation_status")?,
            project_id: project.project_id,
            pillar_scores: Vec::new(),
        }),
        None => None,
    };
    Ok(ProjectWithEvaluation {
        project,
        evaluation,
        project_data: None,
    })
}

fn answers_for(conn: &Connection, project_id: ProjectId) -> rusqlite::Result<Vec<ProjectAnswer>> {
    let mut stmt = conn.prepare(
        "SELECT pd.data_id, pd.project_id, pd.issue_id, pd.value,
                ki.name AS issue_name, ki.pillar
         FROM project_data pd
         JOIN key_issue ki ON pd.issue_id = ki.issue_id
         WHERE pd.project_id = ?1
         ORDER BY pd.data_id",
    )?;
    let answers = stmt
        .query_map(params![project_id], |row| {
            Ok(ProjectAnswer {
                data_id: row.get("data_id")?,
                project_id: row.get("project_id")?,
                issue_id: row.get("issue_id")?,
                value: row.get("value")?,
                issue_name: row.get("issue_name")?,
                pillar: Some(parse_column::<Pillar>(row, "pillar")?),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(answers)
}

impl Store {
    /// Insert a project and its answers in one transaction.
    ///
    /// The request must already be validated. An unknown `issue_id` (or
    /// user) fails with [`Error::InvalidReference`] and nothing is written.
    pub async fn create_project(
        &self,
        user_id: UserId,
        request: &CreateProjectRequest,
    ) -> Result<Project> {
        let request = request.clone();
        self.call(move |conn| {
            let submitted_at = Utc::now();
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO projects (user_id, project_name, industry, annual_revenue,
                                       description, status, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user_id,
                    request.project_name,
                    request.industry,
                    request.annual_revenue,
                    request.description,
                    ProjectStatus::Pending.as_str(),
                    submitted_at,
                ],
            )
            .map_err(|e| Error::from_write(e, "project owner"))?;
            let project_id = tx.last_insert_rowid();

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO project_data (project_id, issue_id, value) VALUES (?1, ?2, ?3)",
                )?;
                for answer in &request.project_data {
                    stmt.execute(params![project_id, answer.issue_id, answer.value])
                        .map_err(|e| {
                            Error::from_write(e, &format!("issue_id {}", answer.issue_id))
                        })?;
                }
            }
            tx.commit()?;

            tracing::info!(
                project_id,
                user_id,
                answers = request.project_data.len(),
                "Created project"
            );
            Ok(Project {
                project_id,
                project_name: request.project_name,
                submitted_at,
                industry: request.industry,
                annual_revenue: request.annual_revenue,
                status: ProjectStatus::Pending,
                description: request.description,
                user_id,
            })
        })
        .await
    }

    /// The user's projects, newest first, with evaluation summaries.
    pub async fn list_projects(&self, user_id: UserId) -> Result<Vec<ProjectWithEvaluation>> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{PROJECT_WITH_EVALUATION}
                 WHERE p.user_id = ?1
                 ORDER BY p.submitted_at DESC, p.project_id DESC"
            ))?;
            let projects = stmt
                .query_map(params![user_id], summary_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
        .await
    }

    /// One of the user's projects with answers and the full evaluation.
    ///
    /// Returns `None` when the project does not exist or belongs to
    /// someone else.
    pub async fn get_project(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<ProjectWithEvaluation>> {
        self.call(move |conn| {
            let Some(mut view) = conn
                .query_row(
                    &format!(
                        "{PROJECT_WITH_EVALUATION} WHERE p.project_id = ?1 AND p.user_id = ?2"
                    ),
                    params![project_id, user_id],
                    summary_from_row,
                )
                .optional()?
            else {
                return Ok(None);
            };

            view.project_data = Some(answers_for(conn, project_id)?);
            if let Some(evaluation) = view.evaluation.as_mut() {
                evaluation.pillar_scores = pillar_scores_for(conn, evaluation.evaluation_id)?;
            }
            Ok(Some(view))
        })
        .await
    }

    /// Delete one of the user's projects. Answers, evaluation and pillar
    /// scores go with it. Returns whether a row was deleted.
    pub async fn delete_project(&self, project_id: ProjectId, user_id: UserId) -> Result<bool> {
        self.call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM projects WHERE project_id = ?1 AND user_id = ?2",
                params![project_id, user_id],
            )?;
            if deleted > 0 {
                tracing::info!(project_id, user_id, "Deleted project");
            }
            Ok(deleted > 0)
        })
        .await
    }

    /// Set a project's status. Returns whether the project exists.
    pub async fn update_project_status(
        &self,
        project_id: ProjectId,
        status: ProjectStatus,
    ) -> Result<bool> {
        self.call(move |conn| {
            let updated = conn.execute(
                "UPDATE projects SET status = ?1 WHERE project_id = ?2",
                params![status.as_str(), project_id],
            )?;
            Ok(updated > 0)
        })
        .await
    }

    /// Projects still marked `PROCESSING`, oldest first.
    ///
    /// Evaluations run in memory, so after a restart these rows have no task
    /// behind them.
    pub async fn processing_projects(&self) -> Result<Vec<ProjectId>> {
        self.call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT project_id FROM projects WHERE status = ?1 ORDER BY project_id",
            )?;
            let ids = stmt
                .query_map(params![ProjectStatus::Processing.as_str()], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<ProjectId>>>()?;
            Ok(ids)
        })
        .await
    }

    /// Dashboard counters for one user.
    ///
    /// `passed_projects` counts evaluations with verdict `PASSED`;
    /// `average_score` averages stored overall scores (0 when none).
    pub async fn project_stats(&self, user_id: UserId) -> Result<ProjectStats> {
        self.call(move |conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*) AS total,
                        COALESCE(SUM(p.status = 'PENDING'), 0),
                        COALESCE(SUM(p.status = 'PROCESSING'), 0),
                        COALESCE(SUM(p.status = 'COMPLETED'), 0),
                        COALESCE(SUM(p.status = 'FAILED'), 0),
                        COALESCE(SUM(e.status = 'PASSED'), 0),
                        COALESCE(AVG(e.overall_score), 0.0)
                 FROM projects p
                 LEFT JOIN evaluations e ON e.project_id = p.project_id
                 WHERE p.user_id = ?1",
                params![user_id],
                |row| {
                    Ok(ProjectStats {
                        total_projects: row.get(0)?,
                        pending_projects: row.get(1)?,
                        processing_projects: row.get(2)?,
                        completed_projects: row.get(3)?,
                        failed_projects: row.get(4)?,
                        passed_projects: row.get(5)?,
                        average_score: row.get(6)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
    }
}
