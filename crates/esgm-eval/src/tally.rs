//! Pillar aggregation.

use esgm_core::{EvaluationOutcome, EvaluationStatus, Pillar, PillarResult, StandardId};

use crate::EvaluationInput;

/// Round to one decimal place.
pub fn round_score(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Answer count and weight of one pillar of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarTally {
    /// Pillar counted
    pub pillar: Pillar,
    /// Number of answers in this pillar
    pub key_count: i64,
    /// Sum of the MSCI weights of those answers
    pub total_weight: f64,
    /// Standard of the first answer in this pillar
    pub standard_id: StandardId,
}

impl PillarTally {
    /// Tally every answered pillar of `input`, in E/S/G order.
    pub fn from_input(input: &EvaluationInput) -> Vec<PillarTally> {
        Pillar::ALL
            .into_iter()
            .filter_map(|pillar| {
                let mut answers = input.answers.iter().filter(|a| a.pillar == pillar);
                let first = answers.next()?;
                let mut tally = PillarTally {
                    pillar,
                    key_count: 1,
                    total_weight: first.msci_weight,
                    standard_id: first.standard_id,
                };
                for answer in answers {
                    tally.key_count += 1;
                    tally.total_weight += answer.msci_weight;
                }
                Some(tally)
            })
            .collect()
    }

    /// Combine per-pillar scores into an outcome.
    ///
    /// `score_for` is called once per tally, in order. A pillar's `weight`
    /// is its share of the summed MSCI weight, or an equal share when every
    /// weight is zero. The overall score is the weight-averaged pillar
    /// score under the same fallback.
    pub fn combine<F>(
        tallies: &[PillarTally],
        pass_threshold: f64,
        mut score_for: F,
    ) -> EvaluationOutcome
    where
        F: FnMut(Pillar) -> f64,
    {
        if tallies.is_empty() {
            return EvaluationOutcome {
                overall_score: 0.0,
                status: EvaluationStatus::Failed,
                pillar_scores: Vec::new(),
            };
        }

        let grand_total: f64 = tallies.iter().map(|t| t.total_weight).sum();
        let weighted = grand_total > 0.0;
        let equal_share = 1.0 / tallies.len() as f64;

        let pillar_scores: Vec<PillarResult> = tallies
            .iter()
            .map(|tally| {
                let score = score_for(tally.pillar);
                PillarResult {
                    pillar: tally.pillar,
                    score,
                    weight: if weighted {
                        tally.total_weight / grand_total
                    } else {
                        equal_share
                    },
                    pass_status: score >= pass_threshold,
                    key_count: tally.key_count,
                    total_weight: tally.total_weight,
                    weighted_sum: score * tally.total_weight,
                    standard_id: tally.standard_id,
                }
            })
            .collect();

        let overall = if weighted {
            pillar_scores.iter().map(|p| p.weighted_sum).sum::<f64>() / grand_total
        } else {
            pillar_scores.iter().map(|p| p.score).sum::<f64>() / pillar_scores.len() as f64
        };
        let overall_score = round_score(overall);

        EvaluationOutcome {
            overall_score,
            status: if overall_score >= pass_threshold {
                EvaluationStatus::Passed
            } else {
                EvaluationStatus::Failed
            },
            pillar_scores,
        }
    }
}
