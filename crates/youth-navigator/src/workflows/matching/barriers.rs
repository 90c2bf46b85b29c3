use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::catalog::ResourceCatalog;
use super::classifier::urgency_key;
use super::domain::Resource;
use super::eligibility;
use super::keywords::KeywordTrigger;
use crate::workflows::intake::domain::{FactValue, Facts, QuestionKind};

const NEGATIVE_CHOICE_MARKERS: &[&str] = &["emergency", "urgent", "no", "cannot", "don't"];

/// Maps barrier wording to the resources believed to mitigate it.
#[derive(Debug, Clone)]
pub struct BarrierRule {
    label: String,
    triggers: Vec<KeywordTrigger>,
    resource_ids: Vec<String>,
}

impl BarrierRule {
    pub fn new<T, R>(label: impl Into<String>, triggers: T, resource_ids: R) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            label: label.into(),
            triggers: triggers
                .into_iter()
                .map(|trigger| KeywordTrigger::new(trigger.as_ref()))
                .collect(),
            resource_ids: resource_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn applies_to(&self, barrier: &str) -> bool {
        let label = self.label.to_lowercase();
        barrier.contains(&label)
            || contains_words(&label, barrier)
            || self.triggers.iter().any(|trigger| trigger.hits(barrier))
    }
}

#[derive(Debug, Clone)]
pub struct BarrierResolver {
    rules: Vec<BarrierRule>,
}

impl BarrierResolver {
    pub fn new(rules: Vec<BarrierRule>) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            BarrierRule::new(
                "transportation",
                ["transport", "get to", "way to"],
                ["transport-1"],
            ),
            BarrierRule::new(
                "documentation",
                ["documentation", "id", "identification"],
                ["id-1", "food-2"],
            ),
            BarrierRule::new(
                "limited space",
                ["space", "capacity", "full"],
                ["shelter-1", "housing-3", "comprehensive-center"],
            ),
        ])
    }

    pub fn rules(&self) -> &[BarrierRule] {
        &self.rules
    }

    /// Best-effort discovery of resources that help with `barriers`.
    ///
    /// Candidates are kept when eligible or merely missing information; an
    /// empty result is an ordinary outcome.
    pub fn find_helpers_for<'a>(
        &self,
        catalog: &'a ResourceCatalog,
        barriers: &[String],
        exclude_id: &str,
        facts: &Facts,
    ) -> Vec<&'a Resource> {
        let mut candidate_ids = BTreeSet::new();
        for barrier in barriers {
            let barrier = barrier.trim().to_lowercase();
            if barrier.is_empty() {
                continue;
            }
            for rule in self.rules.iter().filter(|rule| rule.applies_to(&barrier)) {
                candidate_ids.extend(rule.resource_ids.iter().map(String::as_str));
            }
        }
        candidate_ids.remove(exclude_id);

        let mut helpers: Vec<&Resource> = catalog
            .resources()
            .iter()
            .filter(|resource| candidate_ids.contains(resource.id.as_str()))
            .filter(|resource| {
                let result = eligibility::evaluate(resource, facts);
                result.eligible || !result.is_disqualified()
            })
            .collect();
        helpers.sort_by_key(|resource| urgency_key(resource, None));

        debug!(
            barriers = barriers.len(),
            candidates = candidate_ids.len(),
            helpers = helpers.len(),
            "resolved barrier helpers"
        );

        helpers
    }
}

/// Barrier labels revealed by a user's answers to a resource's follow-up questions.
///
/// A yes/no answer of "no" or a multiple-choice answer signalling urgency or
/// inability surfaces the question's barrier.
pub fn identify_barriers(resource: &Resource, answers: &BTreeMap<String, FactValue>) -> Vec<String> {
    let mut barriers = Vec::new();

    for question in &resource.follow_up_questions {
        let Some(answer) = answers.get(&question.field) else {
            continue;
        };

        let revealed = match question.kind {
            QuestionKind::YesNo => is_negative_flag(answer),
            QuestionKind::Multiple => answer
                .as_text()
                .map(|text| {
                    let text = text.to_lowercase();
                    NEGATIVE_CHOICE_MARKERS
                        .iter()
                        .any(|marker| text.contains(marker))
                })
                .unwrap_or(false),
            QuestionKind::Text | QuestionKind::Number => false,
        };

        if revealed {
            let label = question.barrier_label().to_string();
            if !barriers.contains(&label) {
                barriers.push(label);
            }
        }
    }

    barriers
}

/// Whole-word run of `needle` inside `haystack`, so "space" fits "limited space" but "a" fits nothing.
fn contains_words(haystack: &str, needle: &str) -> bool {
    let needle: Vec<&str> = needle.split_whitespace().collect();
    if needle.is_empty() {
        return false;
    }
    let words: Vec<&str> = haystack.split_whitespace().collect();
    words.windows(needle.len()).any(|window| window == needle.as_slice())
}

fn is_negative_flag(answer: &FactValue) -> bool {
    match answer {
        FactValue::Flag(value) => !value,
        FactValue::Text(text) => matches!(text.trim().to_lowercase().as_str(), "no" | "n" | "false"),
        _ => false,
    }
}
