//! Maps free-form situation text onto the fixed need taxonomy.
//!
//! Matching is table-driven and deliberately generous: a vulnerable user who
//! writes "sleeping in my car" should still reach programs tagged `homeless`.

use std::sync::OnceLock;

use super::keywords::KeywordTrigger;

pub const OTHER_NEEDS: &str = "Other/Multiple needs";

const SITUATION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Need shelter/housing",
        &[
            "shelter",
            "housing",
            "homeless",
            "unsheltered",
            "at-risk",
            "at risk",
            "place to stay",
            "place to sleep",
            "nowhere to go",
            "nowhere",
            "no place",
            "no place to live",
            "couch surfing",
            "couch hopping",
            "couch",
            "living in car",
            "sleeping in car",
            "sleeping in",
            "car",
            "vehicle",
            "tent",
            "camping",
            "kicked out",
            "evicted",
            "can't go home",
            "unsafe home",
            "dangerous home",
            "unsafe",
            "dangerous",
            "staying with friends",
            "temporary housing",
            "transitional housing",
            "need a roof",
            "need somewhere to stay",
            "need accommodation",
            "street",
            "outside",
            "park",
            "bridge",
            "underpass",
            "motel",
            "hotel",
            "can't afford rent",
            "lost my place",
        ],
    ),
    (
        "Need food",
        &[
            "food",
            "hungry",
            "eat",
            "meal",
            "meals",
            "breakfast",
            "lunch",
            "dinner",
            "groceries",
            "food pantry",
            "food bank",
            "nutrition",
            "starving",
            "can't afford food",
            "no money for food",
            "food stamps",
            "snap",
            "need to eat",
            "haven't eaten",
            "food assistance",
            "feed myself",
            "kitchen",
            "cooking",
            "snacks",
            "food insecurity",
        ],
    ),
    (
        "Mental health support",
        &[
            "mental health",
            "depression",
            "anxiety",
            "stressed",
            "overwhelmed",
            "therapy",
            "counseling",
            "counselor",
            "therapist",
            "psychiatrist",
            "medication",
            "meds",
            "suicide",
            "suicidal",
            "self harm",
            "cutting",
            "ptsd",
            "trauma",
            "abuse",
            "panic attacks",
            "panic disorder",
            "bipolar",
            "schizophrenia",
            "addiction",
            "substance abuse",
            "drugs",
            "alcohol",
            "drinking",
            "using",
            "detox",
            "rehab",
            "recovery",
            "emotional support",
            "crisis",
            "emergency",
            "breakdown",
            "feel hopeless",
            "can't cope",
            "need help",
            "support group",
        ],
    ),
    (
        "Education help",
        &[
            "school",
            "education",
            "ged",
            "diploma",
            "college",
            "university",
            "classes",
            "studying",
            "tutoring",
            "homework",
            "learning",
            "dropped out",
            "finish school",
            "go back to school",
            "enrollment",
            "academic",
            "degree",
            "certificate",
            "training program",
            "literacy",
            "reading",
            "writing",
            "math",
            "esl",
            "english",
            "student",
            "books",
            "supplies",
            "tuition",
            "financial aid",
        ],
    ),
    (
        "Job training/employment",
        &[
            "job",
            "work",
            "employment",
            "career",
            "income",
            "money",
            "job training",
            "vocational",
            "skills",
            "resume",
            "interview",
            "unemployed",
            "looking for work",
            "need a job",
            "job search",
            "apprenticeship",
            "internship",
            "workplace",
            "employer",
            "certification",
            "trade",
            "construction",
            "retail",
            "food service",
            "office work",
            "computer skills",
            "job placement",
            "career counseling",
            "can't find work",
            "laid off",
            "fired",
            "between jobs",
        ],
    ),
    (
        OTHER_NEEDS,
        &[
            "multiple",
            "several",
            "many",
            "various",
            "different",
            "everything",
            "all of the above",
            "complex",
            "complicated",
            "don't know",
            "not sure",
            "other",
            "something else",
            "misc",
            "general help",
        ],
    ),
];

struct SituationCategory {
    label: &'static str,
    triggers: Vec<KeywordTrigger>,
}

static CATEGORIES: OnceLock<Vec<SituationCategory>> = OnceLock::new();

fn categories_table() -> &'static [SituationCategory] {
    CATEGORIES.get_or_init(|| {
        SITUATION_KEYWORDS
            .iter()
            .map(|(label, keywords)| SituationCategory {
                label: *label,
                triggers: keywords
                    .iter()
                    .map(|keyword| KeywordTrigger::new(keyword))
                    .collect(),
            })
            .collect()
    })
}

fn category(label: &str) -> Option<&'static SituationCategory> {
    categories_table()
        .iter()
        .find(|category| category.label.eq_ignore_ascii_case(label.trim()))
}

/// Category labels in table order.
pub fn category_labels() -> impl Iterator<Item = &'static str> {
    SITUATION_KEYWORDS.iter().map(|(label, _)| *label)
}

pub fn keywords_for(label: &str) -> Option<&'static [&'static str]> {
    SITUATION_KEYWORDS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(label.trim()))
        .map(|(_, keywords)| *keywords)
}

/// Every category with at least one trigger in `text`, in table order.
pub fn categories_for(text: &str) -> Vec<&'static str> {
    let input = text.trim().to_lowercase();
    if input.is_empty() {
        return Vec::new();
    }

    categories_table()
        .iter()
        .filter(|category| category.triggers.iter().any(|trigger| trigger.hits(&input)))
        .map(|category| category.label)
        .collect()
}

/// Most specific category for `text`: the catch-all bucket only wins when
/// nothing else matched.
pub fn primary_category(text: &str) -> Option<&'static str> {
    let matched = categories_for(text);
    matched
        .iter()
        .copied()
        .find(|label| *label != OTHER_NEEDS)
        .or_else(|| matched.first().copied())
}

/// Category label for `text`, or the original text untouched when nothing matches.
pub fn normalize(text: &str) -> String {
    match primary_category(text) {
        Some(label) => label.to_string(),
        None => text.to_string(),
    }
}

/// Whether the user's situation satisfies a resource's situation tag.
pub fn matches(user_situation: &str, required: &str) -> bool {
    let user = user_situation.trim().to_lowercase();
    let target = required.trim().to_lowercase();
    if user.is_empty() || target.is_empty() {
        return false;
    }

    if user.contains(&target) || target.contains(&user) {
        return true;
    }

    let user_categories = categories_for(&user);
    let target_categories = categories_for(&target);

    for label in &user_categories {
        let label_lower = label.to_lowercase();
        if label_lower.contains(&target) || target.contains(&label_lower) {
            return true;
        }
        if keywords_for(label)
            .map(|keywords| keywords.iter().any(|keyword| *keyword == target))
            .unwrap_or(false)
        {
            return true;
        }
    }

    for label in &target_categories {
        let label_lower = label.to_lowercase();
        if user.contains(&label_lower) || label_lower.contains(&user) {
            return true;
        }
        if let Some(category) = category(label) {
            if category.triggers.iter().any(|trigger| trigger.hits(&user)) {
                return true;
            }
        }
    }

    if let (Some(user_primary), Some(target_primary)) =
        (primary_category(&user), primary_category(&target))
    {
        if user_primary == target_primary {
            return true;
        }
    }

    // The stored answer may already be a category label.
    category(&user)
        .map(|category| category.triggers.iter().any(|trigger| trigger.phrase() == target))
        .unwrap_or(false)
}
