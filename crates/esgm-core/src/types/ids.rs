//! Row identifiers.
//!
//! All identifiers are SQLite `INTEGER PRIMARY KEY AUTOINCREMENT` values and
//! travel as plain JSON numbers, matching the shape clients already consume.

/// Identifier of a registered user.
pub type UserId = i64;

/// Identifier of a submitted project.
pub type ProjectId = i64;

/// Identifier of a key issue (disclosure question).
pub type IssueId = i64;

/// Identifier of a single project answer row.
pub type DataId = i64;

/// Identifier of a project evaluation.
pub type EvaluationId = i64;

/// Identifier of a pillar score row.
pub type ScoreId = i64;

/// Identifier of an MSCI-style standard.
pub type StandardId = i64;
