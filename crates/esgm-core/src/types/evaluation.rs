//! Stored evaluations and the unsaved outcomes evaluators produce.

use serde::{Deserialize, Serialize};

use super::{EvaluationId, EvaluationStatus, Pillar, ProjectId, ScoreId, StandardId};

/// A stored evaluation of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Primary key
    pub evaluation_id: EvaluationId,
    /// Weighted overall score, 0-100
    pub overall_score: f64,
    /// Verdict
    pub status: EvaluationStatus,
    /// Evaluated project
    pub project_id: ProjectId,
    /// Per-pillar breakdown (empty on list views)
    #[serde(default)]
    pub pillar_scores: Vec<PillarScore>,
}

/// A stored per-pillar score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    /// Primary key
    pub score_id: ScoreId,
    /// Pillar scored
    pub pillar_type: Pillar,
    /// Score, 0-100
    pub score: f64,
    /// Share of the overall weight carried by this pillar
    pub weight: f64,
    /// Whether `score` reached the pass threshold
    pub pass_status: bool,
    /// Number of answered key issues in this pillar
    pub key_count: i64,
    /// Sum of the MSCI weights of those key issues
    pub total_weight: f64,
    /// `score * total_weight`
    pub weighted_sum: f64,
    /// Owning evaluation
    pub evaluation_id: EvaluationId,
    /// Standard the key issues came from
    pub standard_id: StandardId,
}

/// A per-pillar result before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarResult {
    /// Pillar scored
    pub pillar: Pillar,
    /// Score, 0-100
    pub score: f64,
    /// Share of the overall weight carried by this pillar
    pub weight: f64,
    /// Whether `score` reached the pass threshold
    pub pass_status: bool,
    /// Number of answered key issues in this pillar
    pub key_count: i64,
    /// Sum of the MSCI weights of those key issues
    pub total_weight: f64,
    /// `score * total_weight`
    pub weighted_sum: f64,
    /// Standard the key issues came from
    pub standard_id: StandardId,
}

/// Everything an evaluator decides about a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    /// Weighted overall score, 0-100
    pub overall_score: f64,
    /// Verdict
    pub status: EvaluationStatus,
    /// Per-pillar breakdown, in E/S/G order
    pub pillar_scores: Vec<PillarResult>,
}

impl EvaluationOutcome {
    /// Look up the result for one pillar.
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarResult> {
        self.pillar_scores.iter().find(|p| p.pillar == pillar)
    }
}

impl Evaluation {
    /// Look up the stored score for one pillar.
    pub fn pillar(&self, pillar: Pillar) -> Option<&PillarScore> {
        self.pillar_scores.iter().find(|p| p.pillar_type == pillar)
    }
}
