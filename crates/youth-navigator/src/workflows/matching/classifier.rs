use serde::Serialize;
use tracing::debug;

use super::domain::Resource;
use super::eligibility::{self, MissingField};
use super::location::DistanceTier;
use crate::workflows::intake::domain::Facts;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleResource<'a> {
    pub resource: &'a Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<DistanceTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IneligibleResource<'a> {
    pub resource: &'a Resource,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentiallyEligibleResource<'a> {
    pub resource: &'a Resource,
    pub missing_info: Vec<MissingField>,
}

/// Three-way partition of a catalog. Every resource lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification<'a> {
    pub eligible: Vec<EligibleResource<'a>>,
    pub ineligible: Vec<IneligibleResource<'a>>,
    pub potentially_eligible: Vec<PotentiallyEligibleResource<'a>>,
}

impl Classification<'_> {
    pub fn total(&self) -> usize {
        self.eligible.len() + self.ineligible.len() + self.potentially_eligible.len()
    }

    pub fn eligible_ids(&self) -> Vec<&str> {
        self.eligible
            .iter()
            .map(|entry| entry.resource.id.as_str())
            .collect()
    }
}

/// Urgent first, then closer, then higher priority. Unconstrained resources
/// count as in the user's area.
pub(crate) fn urgency_key(resource: &Resource, proximity: Option<u8>) -> (u8, u8, u8) {
    (
        u8::from(!resource.urgent),
        proximity.unwrap_or(0),
        resource.priority_rank(),
    )
}

/// Runs the eligibility matcher over every resource and partitions the results.
///
/// Pure: the same catalog and facts always produce the same partition and order.
pub fn classify<'a>(resources: &'a [Resource], facts: &Facts) -> Classification<'a> {
    let mut classification = Classification::default();

    for resource in resources {
        let result = eligibility::evaluate(resource, facts);
        if result.eligible {
            classification.eligible.push(EligibleResource {
                resource,
                proximity: result.proximity,
            });
        } else if result.is_disqualified() {
            classification.ineligible.push(IneligibleResource {
                resource,
                reasons: result.reason_summaries(),
            });
        } else {
            classification
                .potentially_eligible
                .push(PotentiallyEligibleResource {
                    resource,
                    missing_info: result.missing_info,
                });
        }
    }

    let ranks_by_distance = facts.text("location").is_some();
    classification.eligible.sort_by_key(|entry| {
        let proximity = if ranks_by_distance {
            entry.proximity.map(DistanceTier::rank)
        } else {
            None
        };
        urgency_key(entry.resource, proximity)
    });

    debug!(
        eligible = classification.eligible.len(),
        ineligible = classification.ineligible.len(),
        potentially_eligible = classification.potentially_eligible.len(),
        "classified resources"
    );

    classification
}
