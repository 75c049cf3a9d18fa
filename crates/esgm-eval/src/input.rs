//! What an evaluator sees of a project.

use esgm_core::{IssueId, Pillar, ProjectId, StandardId};
use serde::{Deserialize, Serialize};

/// One answer, joined with the key issue it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerInput {
    /// Question answered
    pub issue_id: IssueId,
    /// Pillar of the question
    pub pillar: Pillar,
    /// MSCI weight of the question
    pub msci_weight: f64,
    /// Standard the question belongs to
    pub standard_id: StandardId,
    /// Submitted value
    pub value: String,
}

/// A project's answers, ready to be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Project being evaluated
    pub project_id: ProjectId,
    /// Answers in submission order
    pub answers: Vec<AnswerInput>,
}

impl EvaluationInput {
    /// Pillars with at least one answer, in E/S/G order.
    pub fn answered_pillars(&self) -> Vec<Pillar> {
        Pillar::ALL
            .into_iter()
            .filter(|p| self.answers.iter().any(|a| a.pillar == *p))
            .collect()
    }
}
