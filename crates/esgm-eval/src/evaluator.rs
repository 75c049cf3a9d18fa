//! Evaluators: fixed and random pillar scores.

use std::sync::Mutex;

use esgm_core::{EvaluationConfig, EvaluationMode, EvaluationOutcome, Pillar};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{EvaluationInput, PillarTally};

/// Scores a project submission.
pub trait Evaluator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Produce the outcome to store for `input`.
    fn evaluate(&self, input: &EvaluationInput) -> EvaluationOutcome;
}

/// Gives every answered pillar the same score.
#[derive(Debug, Clone)]
pub struct FixedEvaluator {
    score: f64,
    pass_threshold: f64,
}

impl FixedEvaluator {
    /// Score every pillar `score`, passing at `pass_threshold`.
    pub fn new(score: f64, pass_threshold: f64) -> Self {
        Self {
            score,
            pass_threshold,
        }
    }
}

impl Evaluator for FixedEvaluator {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn evaluate(&self, input: &EvaluationInput) -> EvaluationOutcome {
        let tallies = PillarTally::from_input(input);
        PillarTally::combine(&tallies, self.pass_threshold, |_| self.score)
    }
}

/// Draws each answered pillar's score uniformly from the tenths in
/// `[0, 100)`, so `0.0` through `99.9`.
#[derive(Debug)]
pub struct RandomEvaluator {
    pass_threshold: f64,
    rng: Mutex<StdRng>,
}

impl RandomEvaluator {
    /// Evaluator seeded from the operating system.
    pub fn new(pass_threshold: f64) -> Self {
        Self::from_rng(pass_threshold, StdRng::from_entropy())
    }

    /// Deterministic evaluator.
    pub fn seeded(pass_threshold: f64, seed: u64) -> Self {
        Self::from_rng(pass_threshold, StdRng::seed_from_u64(seed))
    }

    fn from_rng(pass_threshold: f64, rng: StdRng) -> Self {
        Self {
            pass_threshold,
            rng: Mutex::new(rng),
        }
    }

    fn draw(&self) -> f64 {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Whole tenths keep the score below 100 after rounding.
        f64::from(rng.gen_range(0..1000u32)) / 10.0
    }
}

impl Evaluator for RandomEvaluator {
    fn name(&self) -> &'static str {
        "random"
    }

    fn evaluate(&self, input: &EvaluationInput) -> EvaluationOutcome {
        let tallies = PillarTally::from_input(input);
        let outcome = PillarTally::combine(&tallies, self.pass_threshold, |_: Pillar| self.draw());
        tracing::debug!(
            project_id = input.project_id,
            overall = outcome.overall_score,
            "Random evaluation drawn"
        );
        outcome
    }
}

/// Evaluator for the configured mode; `None` for [`EvaluationMode::Noop`].
pub fn build_evaluator(config: &EvaluationConfig) -> Option<Box<dyn Evaluator>> {
    match config.mode {
        EvaluationMode::Noop => None,
        EvaluationMode::Fixed => Some(Box::new(FixedEvaluator::new(
            config.fixed_score,
            config.pass_threshold,
        ))),
        EvaluationMode::Random => Some(Box::new(match config.seed {
            Some(seed) => RandomEvaluator::seeded(config.pass_threshold, seed),
            None => RandomEvaluator::new(config.pass_threshold),
        })),
    }
}
