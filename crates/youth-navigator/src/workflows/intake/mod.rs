//! Conditional questionnaire, the fact set it produces, and the sessions that
//! walk a user through it.

pub mod distress;
pub mod domain;
pub mod extraction;
pub mod flow;
mod questions;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    format_number, Condition, ConditionOperator, FactValue, Facts, Question, QuestionKind,
};
pub use distress::{detect_distress, fact_signals_distress};
pub use extraction::{fact_from_json, ExtractionResponse, UrgencyLevel};
pub use flow::{evaluate, is_eligible, Predicate, QuestionFlow};
pub use questions::{FOOD_SITUATION, MENTAL_HEALTH_SITUATION, SHELTER_SITUATION};
pub use repository::{RepositoryError, SessionRepository};
pub use router::intake_router;
pub use service::{BarrierHelp, IntakeService, IntakeServiceError};
pub use session::{
    coerce_answer, AnswerHistory, AnswerOutcome, IntakeSession, SessionError, SessionId,
    SessionView,
};
