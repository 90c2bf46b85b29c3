//! Phrases in a user's own words that call for crisis support.
//!
//! Matching is plain case-insensitive substring search over the table; a
//! single hit is enough.

use super::domain::FactValue;

const DISTRESS_PHRASES: &[&str] = &[
    "suicidal",
    "kill myself",
    "kill me",
    "hurt myself",
    "self harm",
    "abuse",
    "abused",
    "want to die",
    "wanna die",
    "wish i was dead",
    "end my life",
    "ending my life",
    "unsafe",
    "don't feel safe",
    "no where to go",
    "scared",
    "alone",
    "depressed",
    "panic",
    "overwhelmed",
    "crisis",
    "need help now",
    "hopeless",
    "can't go on",
    "runaway",
    // Spanish
    "suicida",
    "quiero morir",
    "no quiero vivir",
    "me siento solo",
    "me siento mal",
    "necesito ayuda",
    "abuso",
    "abusado",
    "miedo",
    "asustado",
    "no estoy seguro",
    "pánico",
];

/// True when `text` contains any distress phrase.
pub fn detect_distress(text: &str) -> bool {
    let text = text.to_lowercase();
    DISTRESS_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Same check over every piece of text inside a fact value.
pub fn fact_signals_distress(value: &FactValue) -> bool {
    match value {
        FactValue::Text(text) => detect_distress(text),
        FactValue::List(items) => items.iter().any(fact_signals_distress),
        FactValue::Flag(_) | FactValue::Number(_) => false,
    }
}
