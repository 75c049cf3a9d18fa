//! Key issues: the configurable disclosure questions of the submission form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{InputType, IssueId, Pillar, StandardId};

/// A disclosure question, with the rendering hints derived from its criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIssue {
    /// Primary key
    pub issue_id: IssueId,
    /// Short question label
    pub name: String,
    /// Pillar the question belongs to
    pub pillar: Pillar,
    /// Longer explanation shown under the field
    pub description: Option<String>,
    /// Relative weight used when aggregating pillar scores
    pub msci_weight: f64,
    /// Standard the question was taken from
    pub standard_id: StandardId,
    /// Form control to render
    pub input_type: InputType,
    /// Choices for dropdown questions
    pub dropdown_options: Vec<String>,
    /// Raw criteria document
    pub criteria: Value,
    /// Raw benchmark document of the standard
    pub benchmark: Value,
}

impl KeyIssue {
    /// Build a key issue, deriving `input_type` and `dropdown_options`
    /// from `criteria`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        issue_id: IssueId,
        name: impl Into<String>,
        pillar: Pillar,
        description: Option<String>,
        msci_weight: f64,
        standard_id: StandardId,
        criteria: Value,
        benchmark: Value,
    ) -> Self {
        let (input_type, dropdown_options) = InputType::from_criteria(&criteria);
        Self {
            issue_id,
            name: name.into(),
            pillar,
            description,
            msci_weight,
            standard_id,
            input_type,
            dropdown_options,
            criteria,
            benchmark,
        }
    }
}
