//! Resource matching: situation normalization, location proximity, per-resource
//! eligibility, catalog classification, and barrier follow-up.

pub mod barriers;
pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod eligibility;
mod keywords;
pub mod location;
pub mod situation;

#[cfg(test)]
mod tests;

pub use barriers::{identify_barriers, BarrierResolver, BarrierRule};
pub use catalog::{CatalogError, ResourceCatalog};
pub use classifier::{
    classify, Classification, EligibleResource, IneligibleResource, PotentiallyEligibleResource,
};
pub use domain::{
    AgeRange, ContactInfo, DurationBucket, EligibilityCriteria, FollowUpQuestion, Priority,
    Resource,
};
pub use eligibility::{bucket_duration, DisqualificationReason, EligibilityResult, MissingField};
pub use location::{distance_label, match_location, metro_of, DistanceTier, LocationMatch, MetroArea};
