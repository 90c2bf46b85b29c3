use std::collections::BTreeSet;

use super::common::*;
use crate::workflows::intake::domain::{
    Condition, ConditionOperator, FactValue, Facts, Question, QuestionKind,
};
use crate::workflows::intake::flow::{evaluate, is_eligible, Predicate};
use crate::workflows::intake::QuestionFlow;

fn facts<const N: usize>(entries: [(&str, FactValue); N]) -> Facts {
    entries.into_iter().collect()
}

#[test]
fn equals_requires_matching_type_and_value() {
    let condition = Condition::equals("age", 20);
    assert!(evaluate(&condition, &facts([("age", FactValue::Number(20.0))])));
    assert!(!evaluate(&condition, &facts([("age", FactValue::from("20"))])));
    assert!(!evaluate(&condition, &Facts::new()));
}

#[test]
fn not_equals_holds_for_absent_fields() {
    let condition = Condition::not_equals("situation", "Need food");
    assert!(condition.holds(&Facts::new()));
    assert!(!condition.holds(&facts([("situation", FactValue::from("Need food"))])));
}

#[test]
fn includes_only_looks_inside_lists() {
    let condition = Condition::includes("needs", "food");
    let listed = facts([(
        "needs",
        FactValue::List(vec![FactValue::from("shelter"), FactValue::from("food")]),
    )]);
    assert!(condition.holds(&listed));
    assert!(!condition.holds(&facts([("needs", FactValue::from("food"))])));
}

#[test]
fn ordering_operators_fail_closed_on_non_numbers() {
    let young = facts([("age", FactValue::Number(19.0))]);
    assert!(Condition::less_than("age", 25).holds(&young));
    assert!(!Condition::greater_than("age", 25).holds(&young));
    assert!(!Condition::less_than("age", 25).holds(&facts([("age", FactValue::from("19"))])));
    assert!(!Condition::less_than("age", 25).holds(&Facts::new()));
}

#[test]
fn unknown_operators_deserialize_and_evaluate_false() {
    let condition: Condition = serde_json::from_value(serde_json::json!({
        "field": "age",
        "operator": "between",
        "value": 20
    }))
    .expect("unknown operator still parses");

    assert_eq!(condition.operator, ConditionOperator::Unknown);
    assert!(!condition.holds(&facts([("age", FactValue::Number(20.0))])));
}

#[test]
fn skip_conditions_win_over_show_conditions() {
    let question = Question::new("hasId", "hasId", QuestionKind::YesNo, "ID?")
        .show_if(Condition::equals("situation", "Need food"))
        .skip_if(Condition::equals("crisisLevel", true));
    let both = facts([
        ("situation", FactValue::from("Need food")),
        ("crisisLevel", FactValue::Flag(true)),
    ]);

    assert!(!is_eligible(&question, &both));
    assert!(is_eligible(
        &question,
        &facts([("situation", FactValue::from("Need food"))])
    ));
}

#[test]
fn question_without_conditions_is_always_eligible() {
    let question = Question::new("location", "location", QuestionKind::Text, "Where?");
    assert!(question.holds(&Facts::new()));
}

#[test]
fn next_question_skips_hidden_questions() {
    let flow = branching_flow();
    let answered = facts([
        ("situation", FactValue::from("Need food")),
        ("age", FactValue::Number(30.0)),
    ]);

    assert_eq!(flow.next_question_id(&answered, None), Some("situation"));
    assert_eq!(flow.next_question_id(&answered, Some("age")), Some("hasId"));
    assert_eq!(flow.next_question_id(&answered, Some("hasId")), None);
    assert!(flow.is_complete(&answered, Some("hasId")));
}

#[test]
fn next_question_never_moves_backwards() {
    let flow = branching_flow();
    let answered = facts([
        ("situation", FactValue::from("Need shelter/housing")),
        ("age", FactValue::Number(19.0)),
        ("inSchool", FactValue::Flag(true)),
    ]);

    for (index, question) in flow.questions().iter().enumerate() {
        if let Some(next) = flow.next_question_id(&answered, Some(&question.id)) {
            let position = flow.position(next).expect("returned id exists");
            assert!(position > index, "{next} returned after {}", question.id);
        }
    }
}

#[test]
fn unknown_current_id_scans_from_the_top() {
    let flow = branching_flow();
    assert_eq!(
        flow.next_question_id(&Facts::new(), Some("retired-question")),
        Some("situation")
    );
}

#[test]
fn clean_purges_answers_to_hidden_questions() {
    let flow = branching_flow();
    let mut answered = facts([
        ("situation", FactValue::from("Need shelter/housing")),
        ("age", FactValue::Number(19.0)),
        ("housingDuration", FactValue::from("Months")),
    ]);
    assert!(flow.question("housingDuration").expect("exists").holds(&answered));

    answered.insert("situation", "Need food");
    let cleaned = flow.clean(&answered);

    assert!(!cleaned.contains("housingDuration"));
    assert_eq!(cleaned.text("situation").as_deref(), Some("Need food"));
    assert_eq!(cleaned.number("age"), Some(19.0));
}

#[test]
fn clean_follows_dependency_chains_to_a_fixpoint() {
    let flow = branching_flow();
    let answered = facts([
        ("age", FactValue::Number(30.0)),
        ("inSchool", FactValue::Flag(true)),
        ("schoolType", FactValue::from("College")),
    ]);

    let cleaned = flow.clean(&answered);

    assert!(!cleaned.contains("inSchool"));
    assert!(!cleaned.contains("schoolType"));
    assert!(cleaned.contains("age"));
}

#[test]
fn clean_drops_fields_no_question_owns() {
    let flow = branching_flow();
    let cleaned = flow.clean(&facts([
        ("age", FactValue::Number(20.0)),
        ("favouriteColour", FactValue::from("green")),
    ]));
    assert!(!cleaned.contains("favouriteColour"));
}

#[test]
fn first_unanswered_ignores_answered_and_hidden_questions() {
    let flow = branching_flow();
    let answered = facts([
        ("situation", FactValue::from("Need food")),
        ("age", FactValue::Number(22.0)),
    ]);

    let next = flow
        .first_unanswered(&answered, &BTreeSet::new())
        .expect("a question remains");
    assert_eq!(next.id, "inSchool");
    assert_eq!(flow.answered_questions(&answered).len(), 2);
}

#[test]
fn first_unanswered_passes_over_skipped_questions() {
    let flow = branching_flow();
    let answered = facts([
        ("situation", FactValue::from("Need food")),
        ("age", FactValue::Number(22.0)),
    ]);
    let skipped = BTreeSet::from(["inSchool".to_string()]);

    let next = flow
        .first_unanswered(&answered, &skipped)
        .expect("a question remains");
    assert_eq!(next.id, "hasId");
}

#[test]
fn standard_flow_branches_on_situation() {
    let flow = QuestionFlow::standard();
    let shelter = facts([("situation", FactValue::from("Need shelter/housing"))]);
    let food = facts([("situation", FactValue::from("Need food"))]);

    assert_eq!(flow.next_question_id(&shelter, Some("age")), Some("housingDuration"));
    assert_eq!(flow.next_question_id(&food, Some("age")), Some("foodFrequency"));

    let ids: Vec<&str> = flow
        .eligible_questions(&shelter)
        .iter()
        .map(|question| question.id.as_str())
        .collect();
    assert!(!ids.contains(&"duration"));
}

#[test]
fn standard_flow_round_trips_through_json() {
    let flow = QuestionFlow::standard();
    let encoded = serde_json::to_value(&flow).expect("flow serializes");
    assert_eq!(encoded[0]["type"], "multiple");
    assert_eq!(encoded[2]["showIf"][0]["operator"], "equals");

    let decoded: QuestionFlow = serde_json::from_value(encoded).expect("flow deserializes");
    assert_eq!(decoded, flow);
}
