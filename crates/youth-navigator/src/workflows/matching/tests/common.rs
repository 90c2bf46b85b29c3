use crate::workflows::intake::domain::{FactValue, Facts};
use crate::workflows::matching::domain::{EligibilityCriteria, Priority, Resource};

pub(super) fn facts<const N: usize>(entries: [(&str, FactValue); N]) -> Facts {
    entries.into_iter().collect()
}

pub(super) fn resource(id: &str, criteria: EligibilityCriteria) -> Resource {
    Resource::new(id, format!("Program {id}"), "Test program").with_eligibility(criteria)
}

/// Ages 16 to 24, nothing else.
pub(super) fn youth_program() -> Resource {
    resource("youth", EligibilityCriteria::default().age_between(16, 24))
}

pub(super) fn ranked(id: &str, priority: Priority, locations: &[&str]) -> Resource {
    let criteria = if locations.is_empty() {
        EligibilityCriteria::default()
    } else {
        EligibilityCriteria::default().in_locations(locations.iter().copied())
    };
    resource(id, criteria).with_priority(priority)
}
