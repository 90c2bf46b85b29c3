use serde::{Deserialize, Serialize};

use crate::workflows::intake::domain::QuestionKind;

/// Inclusive age window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// Coarse length of need a program is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationBucket {
    #[serde(rename = "short-term")]
    ShortTerm,
    #[serde(rename = "long-term")]
    LongTerm,
}

impl DurationBucket {
    pub const fn label(self) -> &'static str {
        match self {
            DurationBucket::ShortTerm => "short-term",
            DurationBucket::LongTerm => "long-term",
        }
    }
}

/// Optional constraints; an absent dimension never constrains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<AgeRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub situation: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_id: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_income: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_school: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationBucket>,
}

impl EligibilityCriteria {
    pub fn age_between(mut self, min: u32, max: u32) -> Self {
        self.age = Some(AgeRange {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    pub fn age_at_most(mut self, max: u32) -> Self {
        self.age = Some(AgeRange {
            min: None,
            max: Some(max),
        });
        self
    }

    pub fn age_at_least(mut self, min: u32) -> Self {
        self.age = Some(AgeRange {
            min: Some(min),
            max: None,
        });
        self
    }

    pub fn in_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn for_situations<I, S>(mut self, situations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.situation = situations.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_id(mut self, required: bool) -> Self {
        self.has_id = Some(required);
        self
    }

    pub fn has_income(mut self, required: bool) -> Self {
        self.has_income = Some(required);
        self
    }

    pub fn in_school(mut self, required: bool) -> Self {
        self.in_school = Some(required);
        self
    }

    pub fn duration(mut self, bucket: DurationBucket) -> Self {
        self.duration = Some(bucket);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Post-match question surfacing a practical obstacle to using a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpQuestion {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub field: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barrier: Option<String>,
}

impl FollowUpQuestion {
    pub fn yes_no(
        id: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
        barrier: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            context: None,
            field: field.into(),
            kind: QuestionKind::YesNo,
            options: Vec::new(),
            barrier: Some(barrier.into()),
        }
    }

    pub fn multiple_choice<I, S>(
        id: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
        options: I,
        barrier: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            context: None,
            field: field.into(),
            kind: QuestionKind::Multiple,
            options: options.into_iter().map(Into::into).collect(),
            barrier: Some(barrier.into()),
        }
    }

    /// Label used when this question reveals a barrier.
    pub fn barrier_label(&self) -> &str {
        self.barrier.as_deref().unwrap_or(&self.text)
    }
}

/// One external aid program in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub eligibility: EligibilityCriteria,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_questions: Vec<FollowUpQuestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub what_it_offers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_barriers: Vec<String>,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: Vec::new(),
            eligibility: EligibilityCriteria::default(),
            contact: ContactInfo::default(),
            hours: None,
            notes: None,
            priority: None,
            urgent: false,
            follow_up_questions: Vec::new(),
            what_it_offers: Vec::new(),
            common_barriers: Vec::new(),
        }
    }

    pub fn in_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_eligibility(mut self, criteria: EligibilityCriteria) -> Self {
        self.eligibility = criteria;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact.phone.push(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.contact.email = Some(email.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.contact.website = Some(website.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.contact.address = Some(address.into());
        self
    }

    pub fn with_hours(mut self, hours: impl Into<String>) -> Self {
        self.hours = Some(hours.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn urgent(mut self) -> Self {
        self.urgent = true;
        self
    }

    pub fn with_follow_up(mut self, question: FollowUpQuestion) -> Self {
        self.follow_up_questions.push(question);
        self
    }

    pub fn with_barriers<I, S>(mut self, barriers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_barriers = barriers.into_iter().map(Into::into).collect();
        self
    }

    pub fn offering<I, S>(mut self, offers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.what_it_offers = offers.into_iter().map(Into::into).collect();
        self
    }

    /// Missing priority sorts as low.
    pub fn priority_rank(&self) -> u8 {
        self.priority.unwrap_or(Priority::Low).rank()
    }
}
