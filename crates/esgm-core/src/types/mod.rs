//! Domain types shared by the store, evaluator, API, and client.

mod envelope;
mod evaluation;
mod ids;
mod issue;
mod kinds;
mod project;
mod proptests;
mod user;

pub use envelope::Envelope;
pub use evaluation::{Evaluation, EvaluationOutcome, PillarResult, PillarScore};
pub use ids::{DataId, EvaluationId, IssueId, ProjectId, ScoreId, StandardId, UserId};
pub use issue::KeyIssue;
pub use kinds::{EvaluationStatus, InputType, ParseKindError, Pillar, ProjectStatus};
pub use project::{
    AnswerSubmission, CreateProjectRequest, Project, ProjectAnswer, ProjectStats,
    ProjectWithEvaluation,
};
pub use user::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, User, UserRecord};
