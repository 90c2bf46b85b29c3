use super::super::domain::{AgeRange, DurationBucket, EligibilityCriteria};
use super::super::location::{match_location, DistanceTier};
use super::super::situation;
use super::policy::{DisqualificationReason, MissingField};
use crate::workflows::intake::domain::Facts;

const LONG_TERM_MARKERS: &[&str] = &[
    "long-term",
    "long term",
    "long time",
    "month",
    "year",
    "more than 6",
];

pub(crate) struct CriterionFindings {
    pub reasons: Vec<DisqualificationReason>,
    pub missing: Vec<MissingField>,
    pub proximity: Option<DistanceTier>,
}

/// Buckets a free-text duration answer. Anything unrecognised counts as short-term.
pub fn bucket_duration(answer: &str) -> DurationBucket {
    let answer = answer.trim().to_lowercase();
    if LONG_TERM_MARKERS
        .iter()
        .any(|marker| answer.contains(marker))
    {
        DurationBucket::LongTerm
    } else {
        DurationBucket::ShortTerm
    }
}

pub(crate) fn check_criteria(criteria: &EligibilityCriteria, facts: &Facts) -> CriterionFindings {
    let mut findings = CriterionFindings {
        reasons: Vec::new(),
        missing: Vec::new(),
        proximity: None,
    };

    if let Some(range) = &criteria.age {
        check_age(range, facts, &mut findings);
    }

    if !criteria.location.is_empty() {
        match facts.text("location") {
            None => findings.missing.push(MissingField::Location),
            Some(user_location) => {
                let located = match_location(&user_location, &criteria.location);
                if located.matches {
                    findings.proximity = located.tier;
                } else {
                    findings
                        .reasons
                        .push(DisqualificationReason::LocationUnavailable {
                            allowed: criteria.location.clone(),
                        });
                }
            }
        }
    }

    if !criteria.situation.is_empty() {
        match facts.text("situation") {
            None => findings.missing.push(MissingField::Situation),
            Some(user_situation) => {
                let accepted = criteria
                    .situation
                    .iter()
                    .any(|required| situation::matches(&user_situation, required));
                if !accepted {
                    findings
                        .reasons
                        .push(DisqualificationReason::SituationMismatch {
                            accepted: criteria.situation.clone(),
                        });
                }
            }
        }
    }

    check_flag(
        criteria.has_id,
        facts.flag("hasId"),
        MissingField::IdStatus,
        (
            DisqualificationReason::RequiresId,
            DisqualificationReason::RequiresNoId,
        ),
        &mut findings,
    );
    check_flag(
        criteria.has_income,
        facts.flag("hasIncome"),
        MissingField::IncomeStatus,
        (
            DisqualificationReason::RequiresIncome,
            DisqualificationReason::RequiresNoIncome,
        ),
        &mut findings,
    );
    check_flag(
        criteria.in_school,
        facts.flag("inSchool"),
        MissingField::SchoolEnrollment,
        (
            DisqualificationReason::RequiresSchoolEnrollment,
            DisqualificationReason::RequiresNotInSchool,
        ),
        &mut findings,
    );

    if let Some(required) = criteria.duration {
        let answer = facts
            .text("housingDuration")
            .or_else(|| facts.text("duration"));
        match answer {
            None => findings.missing.push(MissingField::Duration),
            Some(answer) if bucket_duration(&answer) != required => findings
                .reasons
                .push(DisqualificationReason::DurationMismatch { required }),
            Some(_) => {}
        }
    }

    findings
}

fn check_age(range: &AgeRange, facts: &Facts, findings: &mut CriterionFindings) {
    let Some(age) = facts.number("age") else {
        findings.missing.push(MissingField::Age);
        return;
    };

    if let Some(min) = range.min {
        if age < f64::from(min) {
            findings
                .reasons
                .push(DisqualificationReason::TooYoung { min, age });
        }
    }
    if let Some(max) = range.max {
        if age > f64::from(max) {
            findings
                .reasons
                .push(DisqualificationReason::TooOld { max, age });
        }
    }
}

/// `reasons` is (when the program requires `true`, when it requires `false`).
fn check_flag(
    required: Option<bool>,
    answer: Option<bool>,
    missing: MissingField,
    reasons: (DisqualificationReason, DisqualificationReason),
    findings: &mut CriterionFindings,
) {
    let Some(required) = required else {
        return;
    };

    match answer {
        None => findings.missing.push(missing),
        Some(actual) if actual != required => {
            let (when_required, when_excluded) = reasons;
            findings.reasons.push(if required {
                when_required
            } else {
                when_excluded
            });
        }
        Some(_) => {}
    }
}
