use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Condition, ConditionOperator, FactValue, Facts, Question};

/// Pure yes/no test over the current fact set.
pub trait Predicate {
    fn holds(&self, facts: &Facts) -> bool;
}

impl Predicate for Condition {
    /// Absent facts and unknown operators resolve to `false`, never an error.
    fn holds(&self, facts: &Facts) -> bool {
        let actual = facts.get(&self.field);

        match self.operator {
            ConditionOperator::Equals => actual == Some(&self.value),
            ConditionOperator::NotEquals => actual != Some(&self.value),
            ConditionOperator::Includes => match actual {
                Some(FactValue::List(items)) => items.contains(&self.value),
                _ => false,
            },
            ConditionOperator::GreaterThan => match (actual, &self.value) {
                (Some(FactValue::Number(lhs)), FactValue::Number(rhs)) => lhs > rhs,
                _ => false,
            },
            ConditionOperator::LessThan => match (actual, &self.value) {
                (Some(FactValue::Number(lhs)), FactValue::Number(rhs)) => lhs < rhs,
                _ => false,
            },
            ConditionOperator::Unknown => false,
        }
    }
}

impl Predicate for Question {
    /// `skip_if` wins over `show_if`; no conditions at all means always eligible.
    fn holds(&self, facts: &Facts) -> bool {
        if self.skip_if.iter().any(|condition| condition.holds(facts)) {
            return false;
        }
        self.show_if.iter().all(|condition| condition.holds(facts))
    }
}

pub fn evaluate(condition: &Condition, facts: &Facts) -> bool {
    condition.holds(facts)
}

pub fn is_eligible(question: &Question, facts: &Facts) -> bool {
    question.holds(facts)
}

/// Ordered, immutable questionnaire with conditional visibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionFlow {
    questions: Vec<Question>,
}

impl QuestionFlow {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    /// First eligible question declared strictly after `current_id`.
    ///
    /// A missing or unrecognised `current_id` scans from the top. `None`
    /// means the flow is exhausted and classification can run.
    pub fn next_question_id(&self, facts: &Facts, current_id: Option<&str>) -> Option<&str> {
        let start = current_id
            .and_then(|id| self.position(id))
            .map(|index| index + 1)
            .unwrap_or(0);

        self.questions
            .iter()
            .skip(start)
            .find(|question| question.holds(facts))
            .map(|question| question.id.as_str())
    }

    pub fn next_question(&self, facts: &Facts, current_id: Option<&str>) -> Option<&Question> {
        self.next_question_id(facts, current_id)
            .and_then(|id| self.question(id))
    }

    pub fn is_complete(&self, facts: &Facts, current_id: Option<&str>) -> bool {
        self.next_question_id(facts, current_id).is_none()
    }

    /// Questions currently reachable, in declaration order.
    pub fn eligible_questions(&self, facts: &Facts) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.holds(facts))
            .collect()
    }

    /// Reachable questions that already have an answer on file.
    pub fn answered_questions(&self, facts: &Facts) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.holds(facts) && facts.contains(&question.field))
            .collect()
    }

    /// First reachable question with no answer on file, passing over the ids in `skipped`.
    pub fn first_unanswered(
        &self,
        facts: &Facts,
        skipped: &BTreeSet<String>,
    ) -> Option<&Question> {
        self.questions.iter().find(|question| {
            question.holds(facts)
                && !facts.contains(&question.field)
                && !skipped.contains(&question.id)
        })
    }

    /// Drops every fact whose owning question is no longer reachable.
    ///
    /// Runs to a fixpoint: removing one stale answer can hide a question that
    /// depended on it, whose answer then has to go as well.
    pub fn clean(&self, facts: &Facts) -> Facts {
        let mut cleaned = facts.clone();

        loop {
            let reachable: BTreeSet<&str> = self
                .questions
                .iter()
                .filter(|question| question.holds(&cleaned))
                .map(|question| question.field.as_str())
                .collect();

            let before = cleaned.len();
            cleaned.retain(|field, _| reachable.contains(field));
            if cleaned.len() == before {
                break;
            }
        }

        if cleaned.len() != facts.len() {
            let dropped: Vec<&str> = facts
                .fields()
                .filter(|field| !cleaned.contains(field))
                .collect();
            debug!(?dropped, "pruned stale answers after fact change");
        }

        cleaned
    }
}

impl From<Vec<Question>> for QuestionFlow {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}
