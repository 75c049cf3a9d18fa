//! Small closed vocabularies: pillars, statuses, and form input kinds.
//!
//! Each enum round-trips through the same text used in the database columns
//! and on the wire, so the store can read and write them with `as_str` and
//! `FromStr`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or submitted label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseKindError {
    /// Vocabulary being parsed (e.g. "pillar")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseKindError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Pillar
// ============================================================================

/// ESG disclosure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pillar {
    /// Environmental
    E,
    /// Social
    S,
    /// Governance
    G,
}

impl Pillar {
    /// All pillars in display order.
    pub const ALL: [Pillar; 3] = [Pillar::E, Pillar::S, Pillar::G];

    /// Single-letter code used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::E => "E",
            Pillar::S => "S",
            Pillar::G => "G",
        }
    }

    /// Human-readable pillar name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Pillar::E => "Environmental",
            Pillar::S => "Social",
            Pillar::G => "Governance",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" => Ok(Pillar::E),
            "S" => Ok(Pillar::S),
            "G" => Ok(Pillar::G),
            other => Err(ParseKindError::new("pillar", other)),
        }
    }
}

// ============================================================================
// ProjectStatus
// ============================================================================

/// Lifecycle of a submitted project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Submitted, evaluation not started (or evaluation disabled)
    Pending,
    /// Evaluation is running
    Processing,
    /// Evaluation stored
    Completed,
    /// Evaluation could not be produced
    Failed,
}

impl ProjectStatus {
    /// Text stored in `projects.status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::Processing => "PROCESSING",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ProjectStatus::Pending),
            "PROCESSING" => Ok(ProjectStatus::Processing),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "FAILED" => Ok(ProjectStatus::Failed),
            other => Err(ParseKindError::new("project status", other)),
        }
    }
}

// ============================================================================
// EvaluationStatus
// ============================================================================

/// Verdict of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    /// No verdict yet
    Pending,
    /// Overall score reached the pass threshold
    Passed,
    /// Overall score fell short of the pass threshold
    Failed,
}

impl EvaluationStatus {
    /// Text stored in `evaluations.status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "PENDING",
            EvaluationStatus::Passed => "PASSED",
            EvaluationStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationStatus {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(EvaluationStatus::Pending),
            "PASSED" => Ok(EvaluationStatus::Passed),
            "FAILED" => Ok(EvaluationStatus::Failed),
            other => Err(ParseKindError::new("evaluation status", other)),
        }
    }
}

// ============================================================================
// InputType
// ============================================================================

/// How a submission form renders a key issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Pick one of `dropdown_options`
    Dropdown,
    /// Free numeric entry
    Numeric,
    /// Free text entry
    #[default]
    Text,
}

impl InputType {
    /// Derive the input kind (and dropdown options) from a criteria document.
    ///
    /// Precedence: an `options` array wins, then `type`/`input_type` of
    /// `"numeric"`, then `"dropdown"` with `dropdown_options`. Anything else
    /// renders as text.
    pub fn from_criteria(criteria: &Value) -> (InputType, Vec<String>) {
        if let Some(options) = criteria.get("options").and_then(Value::as_array) {
            return (InputType::Dropdown, string_items(options));
        }

        let declares = |kind: &str| {
            ["type", "input_type"]
                .iter()
                .any(|key| criteria.get(*key).and_then(Value::as_str) == Some(kind))
        };

        if declares("numeric") {
            return (InputType::Numeric, Vec::new());
        }

        if declares("dropdown") {
            let options = criteria
                .get("dropdown_options")
                .and_then(Value::as_array)
                .map(|items| string_items(items))
                .unwrap_or_default();
            return (InputType::Dropdown, options);
        }

        (InputType::Text, Vec::new())
    }
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
