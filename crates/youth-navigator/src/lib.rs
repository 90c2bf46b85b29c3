//! Intake questionnaire and eligibility matching for youth resource navigation.
//!
//! The matching core (`workflows::matching`) and the question-flow navigator
//! (`workflows::intake::flow`) are pure synchronous functions over a fact set.
//! Sessions, the service, and the HTTP router wrap them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
