use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Scalar answer captured for a single fact-set field.
///
/// `List` only appears when an upstream extractor hands over an array; the
/// scripted questionnaire always writes scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<FactValue>),
}

impl FactValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FactValue::Text(value) if value.trim().is_empty())
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Flag(true) => write!(f, "yes"),
            FactValue::Flag(false) => write!(f, "no"),
            FactValue::Number(value) => write!(f, "{}", format_number(*value)),
            FactValue::Text(value) => write!(f, "{value}"),
            FactValue::List(items) => {
                let rendered = items.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{}", rendered.join(", "))
            }
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Flag(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::Number(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        FactValue::Number(f64::from(value))
    }
}

impl From<u32> for FactValue {
    fn from(value: u32) -> Self {
        FactValue::Number(f64::from(value))
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// Renders whole numbers without a trailing `.0` so ages read naturally.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// The user's accumulated answers keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facts(BTreeMap<String, FactValue>);

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FactValue> {
        self.0.get(field)
    }

    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FactValue>,
    ) -> Option<FactValue> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<FactValue> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FactValue)> {
        self.0.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &FactValue) -> bool) {
        self.0.retain(|field, value| keep(field, value));
    }

    /// Absent, or present as empty text.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map(FactValue::is_blank).unwrap_or(true)
    }

    /// Non-empty textual view of a fact; numbers are rendered, flags are not text.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            FactValue::Text(value) if !value.trim().is_empty() => Some(value.clone()),
            FactValue::Number(value) => Some(format_number(*value)),
            _ => None,
        }
    }

    /// Numeric view of a fact, accepting numeric text such as `"19"`.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            FactValue::Number(value) if value.is_finite() => Some(*value),
            FactValue::Text(value) => value.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Yes/no view of a fact. `None` when the question was never answered.
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.get(field)? {
            FactValue::Flag(value) => Some(*value),
            FactValue::Text(value) if value.trim().is_empty() => None,
            FactValue::Text(value) => Some(value.trim().eq_ignore_ascii_case("yes")),
            _ => Some(false),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Facts
where
    K: Into<String>,
    V: Into<FactValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

/// How an answer is collected and coerced before it lands in the fact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    #[serde(rename = "yesno")]
    YesNo,
    Multiple,
    Number,
}

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Includes,
    GreaterThan,
    LessThan,
    /// Any operator name this build does not understand. Always evaluates false.
    Unknown,
}

impl ConditionOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::Includes => "includes",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::Unknown => "unknown",
        }
    }

    fn from_wire(value: &str) -> Self {
        match value {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "includes" => Self::Includes,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            _ => Self::Unknown,
        }
    }
}

impl Serialize for ConditionOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(raw.trim()))
    }
}

/// Declarative `field <operator> value` predicate over the fact set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: FactValue,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<FactValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(field, ConditionOperator::Equals, value)
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(field, ConditionOperator::NotEquals, value)
    }

    pub fn includes(field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(field, ConditionOperator::Includes, value)
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(field, ConditionOperator::GreaterThan, value)
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        Self::new(field, ConditionOperator::LessThan, value)
    }
}

/// One unit of inquiry in the intake questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub field: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub skippable: bool,
    #[serde(default)]
    pub sensitive: bool,
    /// Every condition must hold for the question to be asked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show_if: Vec<Condition>,
    /// Any condition holding hides the question, regardless of `show_if`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_if: Vec<Condition>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        kind: QuestionKind,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            context: None,
            field: field.into(),
            kind,
            options: Vec::new(),
            required: false,
            skippable: false,
            sensitive: false,
            show_if: Vec::new(),
            skip_if: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.skippable = false;
        self
    }

    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn show_if(mut self, condition: Condition) -> Self {
        self.show_if.push(condition);
        self
    }

    pub fn skip_if(mut self, condition: Condition) -> Self {
        self.skip_if.push(condition);
        self
    }
}
