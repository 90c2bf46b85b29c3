mod policy;
mod rules;

pub use policy::{DisqualificationReason, EligibilityResult, MissingField};
pub use rules::bucket_duration;

use super::domain::Resource;
use crate::workflows::intake::domain::Facts;
use policy::decide_eligibility;
use tracing::trace;

/// Matches one resource's criteria against the fact set.
///
/// Stateless and total: every combination of criteria and facts produces a
/// result, never an error.
pub fn evaluate(resource: &Resource, facts: &Facts) -> EligibilityResult {
    let findings = rules::check_criteria(&resource.eligibility, facts);
    let result = decide_eligibility(findings);

    trace!(
        resource = %resource.id,
        eligible = result.eligible,
        reasons = result.reasons.len(),
        missing = result.missing_info.len(),
        "evaluated resource eligibility"
    );

    result
}
