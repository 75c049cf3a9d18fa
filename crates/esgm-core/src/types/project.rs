//! Projects, their submitted answers, and dashboard statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DataId, Evaluation, IssueId, Pillar, ProjectId, ProjectStatus, UserId};

/// A submitted ESG project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Primary key
    pub project_id: ProjectId,
    /// Display name
    pub project_name: String,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
    /// Industry label
    pub industry: String,
    /// Annual revenue in million baht, when disclosed
    pub annual_revenue: Option<f64>,
    /// Evaluation lifecycle
    pub status: ProjectStatus,
    /// Free-form description
    pub description: Option<String>,
    /// Owner
    pub user_id: UserId,
}

/// One stored answer to a key issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnswer {
    /// Primary key
    pub data_id: DataId,
    /// Owning project
    pub project_id: ProjectId,
    /// Question answered
    pub issue_id: IssueId,
    /// Submitted value, always stored as text
    pub value: String,
    /// Question label, present on detail views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_name: Option<String>,
    /// Question pillar, present on detail views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar: Option<Pillar>,
}

/// One answer inside a [`CreateProjectRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    /// Question being answered
    #[serde(default)]
    pub issue_id: IssueId,
    /// Answer text
    #[serde(default)]
    pub value: String,
}

impl AnswerSubmission {
    /// Convenience constructor.
    pub fn new(issue_id: IssueId, value: impl Into<String>) -> Self {
        Self {
            issue_id,
            value: value.into(),
        }
    }
}

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    /// Display name
    #[serde(default)]
    pub project_name: String,
    /// Industry label
    #[serde(default)]
    pub industry: String,
    /// Annual revenue in million baht
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Answers, one per key issue
    #[serde(default)]
    pub project_data: Vec<AnswerSubmission>,
}

/// A project together with whatever has been attached to it so far.
///
/// List views carry the evaluation summary only; detail views also carry
/// the answers and pillar scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithEvaluation {
    /// The project row
    #[serde(flatten)]
    pub project: Project,
    /// Evaluation, once one has been stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    /// Answers, on detail views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_data: Option<Vec<ProjectAnswer>>,
}

/// Per-user dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// All projects owned by the user
    pub total_projects: i64,
    /// Projects with status `PENDING`
    pub pending_projects: i64,
    /// Projects with status `PROCESSING`
    pub processing_projects: i64,
    /// Projects with status `COMPLETED`
    pub completed_projects: i64,
    /// Projects with status `FAILED`
    pub failed_projects: i64,
    /// Evaluations with verdict `PASSED`
    pub passed_projects: i64,
    /// Mean overall score across evaluated projects (0 when none)
    pub average_score: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_project() -> Project {
        Project {
            project_id: 1,
            project_name: "Solar Farm".to_string(),
            submitted_at: Utc::now(),
            industry: "Energy".to_string(),
            annual_revenue: Some(120.5),
            status: ProjectStatus::Pending,
            description: None,
            user_id: 9,
        }
    }

    #[test]
    fn test_project_with_evaluation_flattens() {
        let view = ProjectWithEvaluation {
            project: sample_project(),
            evaluation: None,
            project_data: None,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["project_id"], 1);
        assert_eq!(value["status"], "PENDING");
        assert!(value.get("evaluation").is_none());
        assert!(value.get("project_data").is_none());
    }

    #[test]
    fn test_project_with_evaluation_deserializes() {
        let view = ProjectWithEvaluation {
            project: sample_project(),
            evaluation: None,
            project_data: Some(vec![ProjectAnswer {
                data_id: 1,
                project_id: 1,
                issue_id: 2,
                value: "42".to_string(),
                issue_name: Some("Water usage".to_string()),
                pillar: Some(Pillar::E),
            }]),
        };
        let json = serde_json::to_string(&view).unwrap();
        let back: ProjectWithEvaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.project.project_name, "Solar Farm");
        assert_eq!(back.project_data.unwrap()[0].pillar, Some(Pillar::E));
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let req: CreateProjectRequest =
            serde_json::from_value(json!({"project_name": "x"})).unwrap();
        assert_eq!(req.project_name, "x");
        assert!(req.industry.is_empty());
        assert!(req.project_data.is_empty());
        assert!(req.annual_revenue.is_none());
    }
}
