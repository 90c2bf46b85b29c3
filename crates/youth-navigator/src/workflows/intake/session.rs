use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::distress::{detect_distress, fact_signals_distress};
use super::domain::{FactValue, Facts, Question, QuestionKind};
use super::extraction::ExtractionResponse;
use super::flow::QuestionFlow;
use crate::workflows::matching::situation;

const SITUATION_FIELD: &str = "situation";

/// Identifier wrapper for intake sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every answer the user has ever given, keyed by field.
///
/// Never pruned. Only consulted to pre-fill a question that is about to be
/// asked again; eligibility always reads the cleaned fact set instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerHistory(BTreeMap<String, FactValue>);

impl AnswerHistory {
    pub fn record(&mut self, field: impl Into<String>, value: FactValue) {
        self.0.insert(field.into(), value);
    }

    pub fn recall(&self, field: &str) -> Option<&FactValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Next {
        #[serde(rename = "questionId")]
        question_id: String,
    },
    Complete,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the questionnaire is already complete")]
    NoActiveQuestion,
    #[error("question `{0}` cannot be skipped")]
    NotSkippable(String),
    #[error("an answer is required for question `{0}`")]
    EmptyAnswer(String),
    #[error("`{answer}` is not a number (question `{question}`)")]
    InvalidNumber { question: String, answer: String },
    #[error("unknown question `{0}`")]
    UnknownQuestion(String),
    #[error("question `{0}` is not part of the current flow")]
    QuestionNotReachable(String),
}

/// One user's walk through the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSession {
    pub id: SessionId,
    facts: Facts,
    history: AnswerHistory,
    current_question: Option<String>,
    #[serde(default)]
    skipped: BTreeSet<String>,
    /// Sticky once raised; only a new session clears it.
    #[serde(default)]
    distress_detected: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IntakeSession {
    /// Starts on the first question reachable with no facts.
    pub fn begin(id: SessionId, flow: &QuestionFlow, now: DateTime<Utc>) -> Self {
        let facts = Facts::new();
        let current_question = flow.next_question_id(&facts, None).map(str::to_string);

        Self {
            id,
            facts,
            history: AnswerHistory::default(),
            current_question,
            skipped: BTreeSet::new(),
            distress_detected: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn history(&self) -> &AnswerHistory {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn distress_detected(&self) -> bool {
        self.distress_detected
    }

    /// Questions the user chose to pass on and has not answered since.
    pub fn skipped_questions(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(String::as_str)
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    pub fn current_question<'f>(&self, flow: &'f QuestionFlow) -> Option<&'f Question> {
        self.current_question
            .as_deref()
            .and_then(|id| flow.question(id))
    }

    pub fn is_complete(&self) -> bool {
        self.current_question.is_none()
    }

    /// Previously given answer for the question about to be asked.
    pub fn prefill(&self, flow: &QuestionFlow) -> Option<&FactValue> {
        self.current_question(flow)
            .and_then(|question| self.history.recall(&question.field))
    }

    pub fn answer(
        &mut self,
        flow: &QuestionFlow,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .current_question(flow)
            .ok_or(SessionError::NoActiveQuestion)?;
        if detect_distress(raw) {
            self.raise_distress();
        }
        let value = coerce_answer(question, raw)?;

        self.skipped.remove(&question.id);
        self.history.record(question.field.clone(), value.clone());
        self.facts.insert(question.field.clone(), value);
        self.facts = flow.clean(&self.facts);

        let answered = question.id.clone();
        Ok(self.advance_from(flow, Some(&answered), now))
    }

    /// Leaves the current question unanswered and moves on.
    pub fn skip(
        &mut self,
        flow: &QuestionFlow,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .current_question(flow)
            .ok_or(SessionError::NoActiveQuestion)?;
        if !question.skippable {
            return Err(SessionError::NotSkippable(question.id.clone()));
        }

        self.facts.remove(&question.field);
        self.facts = flow.clean(&self.facts);
        self.skipped.insert(question.id.clone());

        let skipped = question.id.clone();
        Ok(self.advance_from(flow, Some(&skipped), now))
    }

    /// Rewinds to an earlier question.
    ///
    /// Answers to questions declared after it are dropped from the fact set
    /// (history keeps them). Returns the pre-fill for the rewound question.
    pub fn edit(
        &mut self,
        flow: &QuestionFlow,
        question_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<&FactValue>, SessionError> {
        let position = flow
            .position(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        let reachable = flow
            .eligible_questions(&self.facts)
            .iter()
            .any(|question| question.id == question_id);
        if !reachable {
            return Err(SessionError::QuestionNotReachable(question_id.to_string()));
        }

        let kept_fields: Vec<&str> = flow.questions()[..=position]
            .iter()
            .map(|question| question.field.as_str())
            .collect();
        self.facts
            .retain(|field, _| kept_fields.contains(&field));
        self.facts = flow.clean(&self.facts);
        self.current_question = Some(question_id.to_string());
        self.updated_at = now;

        debug!(session = %self.id, question = question_id, "rewound intake session");
        Ok(self.prefill(flow))
    }

    /// Merges facts extracted from free text and jumps to the first gap.
    ///
    /// Questions the user already skipped are not asked again.
    pub fn apply_extraction(
        &mut self,
        flow: &QuestionFlow,
        response: &ExtractionResponse,
        now: DateTime<Utc>,
    ) -> AnswerOutcome {
        let extracted = response.facts();
        let distressed = extracted
            .iter()
            .any(|(_, value)| fact_signals_distress(value));
        if response.needs_immediate_help || distressed {
            self.raise_distress();
        }

        for (field, value) in extracted.iter() {
            let value = if field == SITUATION_FIELD {
                normalize_situation(value.clone())
            } else {
                value.clone()
            };
            self.history.record(field.clone(), value.clone());
            self.facts.insert(field.clone(), value);
        }
        self.facts = flow.clean(&self.facts);

        self.current_question = flow
            .first_unanswered(&self.facts, &self.skipped)
            .map(|question| question.id.clone());
        self.updated_at = now;

        self.outcome()
    }

    /// Sessions idle for longer than `ttl` are discarded.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.updated_at > ttl
    }

    pub fn view(&self, flow: &QuestionFlow) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            complete: self.is_complete(),
            current_question: self.current_question(flow).cloned(),
            prefill: self.prefill(flow).cloned(),
            answered: flow.answered_questions(&self.facts).len(),
            distress_detected: self.distress_detected,
            facts: self.facts.clone(),
            updated_at: self.updated_at,
        }
    }

    fn raise_distress(&mut self) {
        if !self.distress_detected {
            info!(session = %self.id, "distress language detected");
        }
        self.distress_detected = true;
    }

    fn advance_from(
        &mut self,
        flow: &QuestionFlow,
        current: Option<&str>,
        now: DateTime<Utc>,
    ) -> AnswerOutcome {
        self.current_question = flow
            .next_question_id(&self.facts, current)
            .map(str::to_string);
        self.updated_at = now;
        self.outcome()
    }

    fn outcome(&self) -> AnswerOutcome {
        match &self.current_question {
            Some(question_id) => AnswerOutcome::Next {
                question_id: question_id.clone(),
            },
            None => AnswerOutcome::Complete,
        }
    }
}

/// Sanitized representation of a session for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: SessionId,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill: Option<FactValue>,
    pub answered: usize,
    /// Set once the user's own words suggest they need crisis support.
    pub distress_detected: bool,
    pub facts: Facts,
    pub updated_at: DateTime<Utc>,
}

fn affirmative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(yes|y|true|1)$").expect("static pattern compiles"))
}

fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?").expect("static pattern compiles"))
}

/// Turns a raw answer into the fact value its question kind expects.
pub fn coerce_answer(question: &Question, raw: &str) -> Result<FactValue, SessionError> {
    let answer = raw.trim();
    if answer.is_empty() {
        return Err(SessionError::EmptyAnswer(question.id.clone()));
    }

    let value = match question.kind {
        QuestionKind::YesNo => FactValue::Flag(affirmative_pattern().is_match(answer)),
        QuestionKind::Number => {
            let number = leading_number_pattern()
                .find(answer)
                .and_then(|found| found.as_str().parse::<f64>().ok())
                .ok_or_else(|| SessionError::InvalidNumber {
                    question: question.id.clone(),
                    answer: answer.to_string(),
                })?;
            FactValue::Number(number)
        }
        QuestionKind::Text | QuestionKind::Multiple if question.field == SITUATION_FIELD => {
            FactValue::Text(situation::normalize(answer))
        }
        QuestionKind::Text | QuestionKind::Multiple => FactValue::Text(answer.to_string()),
    };

    Ok(value)
}

fn normalize_situation(value: FactValue) -> FactValue {
    match value {
        FactValue::Text(text) => FactValue::Text(situation::normalize(&text)),
        other => other,
    }
}
