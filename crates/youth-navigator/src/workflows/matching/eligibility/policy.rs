use serde::{Serialize, Serializer};

use super::super::domain::DurationBucket;
use super::super::location::DistanceTier;
use super::rules::CriterionFindings;
use crate::workflows::intake::domain::format_number;

/// A fact that is present and violates a resource's constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum DisqualificationReason {
    TooYoung { min: u32, age: f64 },
    TooOld { max: u32, age: f64 },
    LocationUnavailable { allowed: Vec<String> },
    SituationMismatch { accepted: Vec<String> },
    RequiresId,
    RequiresNoId,
    RequiresIncome,
    RequiresNoIncome,
    RequiresSchoolEnrollment,
    RequiresNotInSchool,
    DurationMismatch { required: DurationBucket },
}

impl DisqualificationReason {
    /// Human-readable sentence shown verbatim on ineligible resource cards.
    pub fn summary(&self) -> String {
        match self {
            DisqualificationReason::TooYoung { min, age } => format!(
                "You need to be at least {min} years old (you're {})",
                format_number(*age)
            ),
            DisqualificationReason::TooOld { max, age } => format!(
                "This program is for people up to {max} years old (you're {})",
                format_number(*age)
            ),
            DisqualificationReason::LocationUnavailable { allowed } => {
                format!("This program is only available in: {}", allowed.join(", "))
            }
            DisqualificationReason::SituationMismatch { accepted } => {
                format!("This program is for people who are: {}", accepted.join(" or "))
            }
            DisqualificationReason::RequiresId => "This program requires a valid ID".to_string(),
            DisqualificationReason::RequiresNoId => {
                "This program is for people who do not have an ID".to_string()
            }
            DisqualificationReason::RequiresIncome => {
                "This program is for people who have income".to_string()
            }
            DisqualificationReason::RequiresNoIncome => {
                "This program is for people who do not have income".to_string()
            }
            DisqualificationReason::RequiresSchoolEnrollment => {
                "This program is for people currently enrolled in school".to_string()
            }
            DisqualificationReason::RequiresNotInSchool => {
                "This program is for people not currently in school".to_string()
            }
            DisqualificationReason::DurationMismatch { required } => format!(
                "This program is for people who need {} support",
                required.label()
            ),
        }
    }
}

impl Serialize for DisqualificationReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.summary())
    }
}

/// A fact the resource needs that the user has not supplied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MissingField {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "situation")]
    Situation,
    #[serde(rename = "ID status")]
    IdStatus,
    #[serde(rename = "income status")]
    IncomeStatus,
    #[serde(rename = "school enrollment status")]
    SchoolEnrollment,
    #[serde(rename = "duration of situation")]
    Duration,
}

impl MissingField {
    pub const fn label(self) -> &'static str {
        match self {
            MissingField::Age => "age",
            MissingField::Location => "location",
            MissingField::Situation => "situation",
            MissingField::IdStatus => "ID status",
            MissingField::IncomeStatus => "income status",
            MissingField::SchoolEnrollment => "school enrollment status",
            MissingField::Duration => "duration of situation",
        }
    }

    /// Critical gaps hold a resource back as "potentially eligible"; the rest
    /// can be collected after the match.
    pub const fn is_critical(self) -> bool {
        matches!(
            self,
            MissingField::Age | MissingField::Location | MissingField::Situation
        )
    }
}

/// Outcome of matching one resource against the fact set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<DisqualificationReason>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_info: Vec<MissingField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<DistanceTier>,
}

impl EligibilityResult {
    pub fn is_disqualified(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn has_critical_gap(&self) -> bool {
        self.missing_info.iter().any(|field| field.is_critical())
    }

    pub fn reason_summaries(&self) -> Vec<String> {
        self.reasons
            .iter()
            .map(DisqualificationReason::summary)
            .collect()
    }
}

/// Disqualification always wins; otherwise only critical gaps block eligibility.
pub(crate) fn decide_eligibility(findings: CriterionFindings) -> EligibilityResult {
    let eligible = findings.reasons.is_empty()
        && !findings.missing.iter().any(|field| field.is_critical());

    EligibilityResult {
        eligible,
        reasons: findings.reasons,
        missing_info: findings.missing,
        proximity: findings.proximity,
    }
}
