//! Placeholder ESG evaluation.
//!
//! No submitted value influences a score. An evaluator only decides one
//! number per answered pillar (fixed or random); [`PillarTally`] turns those
//! numbers into the stored breakdown, weighting pillars by the MSCI weights
//! of the key issues that were answered.
//!
//! # Example
//!
//! ```
//! use esgm_core::Pillar;
//! use esgm_eval::{AnswerInput, EvaluationInput, Evaluator, FixedEvaluator};
//!
//! let input = EvaluationInput {
//!     project_id: 1,
//!     answers: vec![AnswerInput {
//!         issue_id: 1,
//!         pillar: Pillar::E,
//!         msci_weight: 2.0,
//!         standard_id: 1,
//!         value: "1200".to_string(),
//!     }],
//! };
//! let outcome = FixedEvaluator::new(75.0, 50.0).evaluate(&input);
//! assert_eq!(outcome.overall_score, 75.0);
//! ```

pub mod evaluator;
pub mod input;
pub mod tally;

pub use evaluator::{Evaluator, FixedEvaluator, RandomEvaluator, build_evaluator};
pub use input::{AnswerInput, EvaluationInput};
pub use tally::{PillarTally, round_score};
