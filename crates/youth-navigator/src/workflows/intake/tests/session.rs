use std::collections::BTreeMap;

use chrono::Duration;
use serde_json::json;

use super::common::*;
use crate::workflows::intake::domain::FactValue;
use crate::workflows::intake::extraction::ExtractionResponse;
use crate::workflows::intake::session::{
    AnswerOutcome, IntakeSession, SessionError, SessionId,
};

fn session() -> IntakeSession {
    IntakeSession::begin(SessionId("intake-test".to_string()), &branching_flow(), now())
}

fn next(question_id: &str) -> AnswerOutcome {
    AnswerOutcome::Next {
        question_id: question_id.to_string(),
    }
}

#[test]
fn begins_on_first_reachable_question() {
    let session = session();
    assert_eq!(session.current_question_id(), Some("situation"));
    assert!(session.facts().is_empty());
    assert!(!session.is_complete());
}

#[test]
fn situation_answers_are_normalized() {
    let flow = branching_flow();
    let mut session = session();

    let outcome = session
        .answer(&flow, "I'm sleeping in my car", now())
        .expect("answer accepted");

    assert_eq!(outcome, next("age"));
    assert_eq!(
        session.facts().text("situation").as_deref(),
        Some("Need shelter/housing")
    );
}

#[test]
fn unmatched_situation_text_is_kept_verbatim() {
    let flow = branching_flow();
    let mut session = session();

    session
        .answer(&flow, "pet adoption", now())
        .expect("answer accepted");

    assert_eq!(
        session.facts().text("situation").as_deref(),
        Some("pet adoption")
    );
}

#[test]
fn number_answers_take_the_leading_number() {
    let flow = branching_flow();
    let mut session = session();
    session.answer(&flow, "Need food", now()).expect("situation");

    let outcome = session.answer(&flow, "19 years old", now()).expect("age");

    assert_eq!(session.facts().number("age"), Some(19.0));
    assert_eq!(outcome, next("inSchool"));
}

#[test]
fn unparseable_numbers_are_rejected() {
    let flow = branching_flow();
    let mut session = session();
    session.answer(&flow, "Need food", now()).expect("situation");

    let error = session
        .answer(&flow, "old enough", now())
        .expect_err("not a number");

    assert!(matches!(error, SessionError::InvalidNumber { ref question, .. } if question == "age"));
    assert_eq!(session.current_question_id(), Some("age"));
    assert!(!session.facts().contains("age"));
}

#[test]
fn blank_answers_are_rejected() {
    let flow = branching_flow();
    let mut session = session();
    let error = session.answer(&flow, "   ", now()).expect_err("blank");
    assert_eq!(error, SessionError::EmptyAnswer("situation".to_string()));
}

#[test]
fn yes_no_answers_become_flags() {
    let flow = branching_flow();
    let mut session = session();
    session.answer(&flow, "Need food", now()).expect("situation");
    session.answer(&flow, "20", now()).expect("age");

    let outcome = session.answer(&flow, "Yes", now()).expect("inSchool");
    assert_eq!(session.facts().get("inSchool"), Some(&FactValue::Flag(true)));
    assert_eq!(outcome, next("schoolType"));

    let mut other = self::session();
    other.answer(&flow, "Need food", now()).expect("situation");
    other.answer(&flow, "20", now()).expect("age");
    let outcome = other.answer(&flow, "not really", now()).expect("inSchool");
    assert_eq!(other.facts().get("inSchool"), Some(&FactValue::Flag(false)));
    assert_eq!(outcome, next("hasId"));
}

#[test]
fn required_questions_cannot_be_skipped() {
    let flow = branching_flow();
    let mut session = session();
    assert_eq!(session.skip(&flow, now()), Ok(next("age")));

    let error = session.skip(&flow, now()).expect_err("age is required");
    assert_eq!(error, SessionError::NotSkippable("age".to_string()));
}

#[test]
fn completing_the_flow_reports_complete() {
    let flow = branching_flow();
    let mut session = session();
    session.answer(&flow, "Need food", now()).expect("situation");
    session.answer(&flow, "40", now()).expect("age");

    let outcome = session.answer(&flow, "yes", now()).expect("hasId");

    assert_eq!(outcome, AnswerOutcome::Complete);
    assert!(session.is_complete());
    assert_eq!(
        session.answer(&flow, "yes", now()),
        Err(SessionError::NoActiveQuestion)
    );
}

#[test]
fn editing_drops_later_answers_but_keeps_history() {
    let flow = branching_flow();
    let mut session = session();
    session
        .answer(&flow, "Need shelter/housing", now())
        .expect("situation");
    session.answer(&flow, "19", now()).expect("age");
    session.answer(&flow, "Months", now()).expect("housingDuration");

    session.edit(&flow, "situation", now()).expect("edit accepted");
    assert_eq!(session.current_question_id(), Some("situation"));
    assert!(!session.facts().contains("age"));
    assert!(!session.facts().contains("housingDuration"));

    let outcome = session.answer(&flow, "Need food", now()).expect("re-answer");
    assert_eq!(outcome, next("age"));
    assert_eq!(session.prefill(&flow), Some(&FactValue::Number(19.0)));
    assert_eq!(
        session.history().recall("housingDuration"),
        Some(&FactValue::from("Months"))
    );
}

#[test]
fn edit_returns_previous_answer_as_prefill() {
    let flow = branching_flow();
    let mut session = session();
    session.answer(&flow, "Need food", now()).expect("situation");
    session.answer(&flow, "22", now()).expect("age");

    let prefill = session.edit(&flow, "age", now()).expect("edit accepted").cloned();

    assert_eq!(prefill, Some(FactValue::Number(22.0)));
    assert_eq!(session.current_question_id(), Some("age"));
}

#[test]
fn edit_rejects_unknown_and_hidden_questions() {
    let flow = branching_flow();
    let mut session = session();

    assert_eq!(
        session.edit(&flow, "favouriteColour", now()),
        Err(SessionError::UnknownQuestion("favouriteColour".to_string()))
    );
    assert_eq!(
        session.edit(&flow, "schoolType", now()),
        Err(SessionError::QuestionNotReachable("schoolType".to_string()))
    );
}

#[test]
fn extraction_merges_facts_and_jumps_to_first_gap() {
    let flow = branching_flow();
    let mut session = session();
    let mut extracted = BTreeMap::new();
    extracted.insert("situation".to_string(), json!("got kicked out last week"));
    extracted.insert("age".to_string(), json!(17));
    extracted.insert("nickname".to_string(), json!(null));
    let response = ExtractionResponse {
        extracted_data: extracted,
        ..ExtractionResponse::default()
    };

    let outcome = session.apply_extraction(&flow, &response, now());

    assert_eq!(outcome, next("housingDuration"));
    assert_eq!(
        session.facts().text("situation").as_deref(),
        Some("Need shelter/housing")
    );
    assert_eq!(session.facts().number("age"), Some(17.0));
    assert!(!session.facts().contains("nickname"));
}

#[test]
fn extraction_does_not_reask_skipped_questions() {
    let flow = branching_flow();
    let mut session = session();
    let outcome = session.skip(&flow, now()).expect("situation is optional");
    assert_eq!(outcome, next("age"));

    let mut extracted = BTreeMap::new();
    extracted.insert("age".to_string(), json!(20));
    let response = ExtractionResponse {
        extracted_data: extracted,
        ..ExtractionResponse::default()
    };

    let outcome = session.apply_extraction(&flow, &response, now());
    assert_eq!(outcome, next("inSchool"));
    assert_eq!(session.skipped_questions().collect::<Vec<_>>(), vec!["situation"]);
}

#[test]
fn distress_in_typed_answers_sticks_for_the_session() {
    let flow = branching_flow();
    let mut session = session();

    session
        .answer(&flow, "I don't feel safe at home and I'm scared", now())
        .expect("answer accepted");
    assert!(session.distress_detected());

    session.answer(&flow, "19", now()).expect("age accepted");
    assert!(session.distress_detected());
}

#[test]
fn ordinary_answers_raise_no_distress() {
    let flow = branching_flow();
    let mut session = session();

    session.answer(&flow, "Need food", now()).expect("answer accepted");
    session.answer(&flow, "22", now()).expect("age accepted");
    assert!(!session.distress_detected());
}

#[test]
fn extracted_text_and_urgent_flags_raise_distress() {
    let flow = branching_flow();

    let mut from_text = session();
    let mut extracted = BTreeMap::new();
    extracted.insert("situation".to_string(), json!("i want to die, nowhere to go"));
    let response = ExtractionResponse {
        extracted_data: extracted,
        ..ExtractionResponse::default()
    };
    from_text.apply_extraction(&flow, &response, now());
    assert!(from_text.distress_detected());

    let mut from_flag = session();
    let response = ExtractionResponse {
        needs_immediate_help: true,
        ..ExtractionResponse::default()
    };
    from_flag.apply_extraction(&flow, &response, now());
    assert!(from_flag.distress_detected());
}

#[test]
fn sessions_expire_after_idle_ttl() {
    let session = session();
    let ttl = Duration::days(7);

    assert!(!session.is_expired(now() + Duration::days(6), ttl));
    assert!(session.is_expired(now() + Duration::days(8), ttl));
}

#[test]
fn view_exposes_current_question_and_prefill() {
    let flow = branching_flow();
    let session = session();
    let view = serde_json::to_value(session.view(&flow)).expect("view serializes");

    assert_eq!(view["sessionId"], "intake-test");
    assert_eq!(view["complete"], false);
    assert_eq!(view["currentQuestion"]["id"], "situation");
    assert_eq!(view["distressDetected"], false);
    assert!(view.get("prefill").is_none());
}
