use super::common::*;
use crate::workflows::intake::domain::{FactValue, Facts};
use crate::workflows::matching::domain::{DurationBucket, EligibilityCriteria};
use crate::workflows::matching::eligibility::{
    bucket_duration, evaluate, DisqualificationReason, MissingField,
};
use crate::workflows::matching::location::DistanceTier;

#[test]
fn missing_age_is_a_critical_gap() {
    let result = evaluate(&youth_program(), &Facts::new());

    assert!(!result.eligible);
    assert!(result.reasons.is_empty());
    assert_eq!(result.missing_info, vec![MissingField::Age]);
    assert!(result.has_critical_gap());
}

#[test]
fn age_outside_range_disqualifies_with_readable_reason() {
    let result = evaluate(&youth_program(), &facts([("age", FactValue::Number(30.0))]));

    assert!(!result.eligible);
    assert_eq!(
        result.reason_summaries(),
        vec!["This program is for people up to 24 years old (you're 30)".to_string()]
    );

    let young = evaluate(&youth_program(), &facts([("age", FactValue::Number(14.0))]));
    assert_eq!(
        young.reasons,
        vec![DisqualificationReason::TooYoung { min: 16, age: 14.0 }]
    );
    assert_eq!(
        young.reasons[0].summary(),
        "You need to be at least 16 years old (you're 14)"
    );
}

#[test]
fn age_bounds_are_inclusive() {
    for age in [16.0, 24.0] {
        let result = evaluate(&youth_program(), &facts([("age", FactValue::Number(age))]));
        assert!(result.eligible, "age {age} should qualify");
    }
}

#[test]
fn numeric_text_ages_are_accepted() {
    let result = evaluate(&youth_program(), &facts([("age", FactValue::from("20"))]));
    assert!(result.eligible);
}

#[test]
fn resource_without_criteria_is_vacuously_eligible() {
    let open = resource("open", EligibilityCriteria::default());
    let result = evaluate(&open, &Facts::new());
    assert!(result.eligible);
    assert!(result.missing_info.is_empty());
    assert!(result.reasons.is_empty());
}

#[test]
fn non_critical_gaps_do_not_block_eligibility() {
    let id_help = resource("id", EligibilityCriteria::default().has_id(false));
    let result = evaluate(&id_help, &Facts::new());

    assert!(result.eligible);
    assert_eq!(result.missing_info, vec![MissingField::IdStatus]);
    assert!(!result.has_critical_gap());
}

#[test]
fn reasons_dominate_missing_information() {
    let program = resource(
        "mixed",
        EligibilityCriteria::default()
            .age_between(18, 21)
            .in_locations(["Sacramento"]),
    );
    let result = evaluate(&program, &facts([("age", FactValue::Number(40.0))]));

    assert!(!result.eligible);
    assert_eq!(result.missing_info, vec![MissingField::Location]);
    assert_eq!(result.reasons.len(), 1);
}

#[test]
fn flag_mismatches_name_the_requirement() {
    let school = resource("school", EligibilityCriteria::default().in_school(true));
    let result = evaluate(&school, &facts([("inSchool", FactValue::Flag(false))]));
    assert_eq!(
        result.reason_summaries(),
        vec!["This program is for people currently enrolled in school".to_string()]
    );

    let jobs = resource("jobs", EligibilityCriteria::default().has_income(false));
    let result = evaluate(&jobs, &facts([("hasIncome", FactValue::from("yes"))]));
    assert_eq!(result.reasons, vec![DisqualificationReason::RequiresNoIncome]);
}

#[test]
fn situation_keywords_bridge_user_text_and_tags() {
    let shelter = resource(
        "shelter",
        EligibilityCriteria::default().for_situations(["homeless"]),
    );
    let sleeping_in_car = facts([
        ("age", FactValue::Number(20.0)),
        ("situation", FactValue::from("sleeping in my car")),
    ]);
    assert!(evaluate(&shelter, &sleeping_in_car).eligible);

    let wants_job = facts([("situation", FactValue::from("Job training/employment"))]);
    let result = evaluate(&shelter, &wants_job);
    assert_eq!(
        result.reason_summaries(),
        vec!["This program is for people who are: homeless".to_string()]
    );
}

#[test]
fn location_mismatch_lists_served_areas() {
    let local = resource(
        "local",
        EligibilityCriteria::default().in_locations(["San Diego", "Chula Vista"]),
    );
    let result = evaluate(&local, &facts([("location", FactValue::from("Fresno"))]));
    assert_eq!(
        result.reason_summaries(),
        vec!["This program is only available in: San Diego, Chula Vista".to_string()]
    );
}

#[test]
fn location_match_records_proximity() {
    let bay = resource(
        "bay",
        EligibilityCriteria::default().in_locations(["San Francisco"]),
    );
    let result = evaluate(&bay, &facts([("location", FactValue::from("San Jose"))]));
    assert!(result.eligible);
    assert_eq!(result.proximity, Some(DistanceTier::Nearby));
}

#[test]
fn duration_is_bucketed_before_comparison() {
    let long_term = resource(
        "tlp",
        EligibilityCriteria::default().duration(DurationBucket::LongTerm),
    );

    let months = evaluate(&long_term, &facts([("housingDuration", FactValue::from("Months"))]));
    assert!(months.eligible);

    let tonight = evaluate(
        &long_term,
        &facts([("housingDuration", FactValue::from("Tonight only"))]),
    );
    assert_eq!(
        tonight.reason_summaries(),
        vec!["This program is for people who need long-term support".to_string()]
    );

    let general = evaluate(
        &long_term,
        &facts([("duration", FactValue::from("A long time - more than 6 months"))]),
    );
    assert!(general.eligible);

    let unknown = evaluate(&long_term, &Facts::new());
    assert!(unknown.eligible);
    assert_eq!(unknown.missing_info, vec![MissingField::Duration]);
}

#[test]
fn unknown_duration_phrases_default_to_short_term() {
    assert_eq!(bucket_duration("Tonight only"), DurationBucket::ShortTerm);
    assert_eq!(bucket_duration("A few days"), DurationBucket::ShortTerm);
    assert_eq!(bucket_duration("no idea honestly"), DurationBucket::ShortTerm);
    assert_eq!(bucket_duration("Weeks"), DurationBucket::ShortTerm);
    assert_eq!(bucket_duration("About a year"), DurationBucket::LongTerm);
}

#[test]
fn result_serializes_reasons_and_missing_labels() {
    let program = resource(
        "combo",
        EligibilityCriteria::default()
            .age_between(16, 24)
            .in_school(true),
    );
    let result = evaluate(&program, &facts([("age", FactValue::Number(40.0))]));
    let encoded = serde_json::to_value(&result).expect("result serializes");

    assert_eq!(encoded["eligible"], false);
    assert_eq!(
        encoded["reasons"][0],
        "This program is for people up to 24 years old (you're 40)"
    );
    assert_eq!(encoded["missingInfo"][0], "school enrollment status");
}
