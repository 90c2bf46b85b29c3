use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::domain::{DurationBucket, EligibilityCriteria, FollowUpQuestion, Priority, Resource};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read resource catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("resource catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("resource id `{0}` appears more than once in the catalog")]
    DuplicateId(String),
}

/// Static list of aid programs the classifier runs against.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCatalog {
    resources: Vec<Resource>,
}

impl ResourceCatalog {
    pub fn new(resources: Vec<Resource>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if !seen.insert(resource.id.as_str()) {
                return Err(CatalogError::DuplicateId(resource.id.clone()));
            }
        }
        Ok(Self { resources })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let resources: Vec<Resource> = serde_json::from_str(raw)?;
        Self::new(resources)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), resources = catalog.len(), "loaded resource catalog");
        Ok(catalog)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Built-in programs used when no catalog file is configured.
    pub fn standard() -> Self {
        Self {
            resources: standard_resources(),
        }
    }
}

fn standard_resources() -> Vec<Resource> {
    vec![
        Resource::new(
            "shelter-1",
            "Youth Emergency Shelter",
            "24/7 emergency shelter for youth ages 16-24",
        )
        .in_categories(["Housing"])
        .with_eligibility(
            EligibilityCriteria::default()
                .age_between(16, 24)
                .for_situations(["homeless", "at-risk"]),
        )
        .with_phone("(555) 123-4567")
        .with_address("123 Main Street, City, State")
        .with_hours("24/7")
        .with_notes("Walk-ins welcome. Provides meals and basic necessities.")
        .offering([
            "Safe place to sleep",
            "Three meals a day",
            "Showers and laundry facilities",
            "Basic hygiene supplies",
            "Case management support",
            "Help finding permanent housing",
        ])
        .with_barriers([
            "Transportation to the shelter",
            "Limited space (first come, first served)",
            "Curfew requirements",
            "Need for ID or documentation",
        ])
        .with_follow_up(FollowUpQuestion::yes_no(
            "transport-barrier",
            "transportToShelter",
            "Do you have a way to get to the shelter? (Bus, ride, walking distance, etc.)",
            "Transportation",
        ))
        .with_follow_up(FollowUpQuestion::yes_no(
            "curfew-barrier",
            "canMeetCurfew",
            "Can you be at the shelter by their curfew time? (Usually around 8-9pm)",
            "Curfew requirements",
        ))
        .with_follow_up(FollowUpQuestion::yes_no(
            "documentation-barrier",
            "hasDocumentation",
            "Do you have any ID or documentation? (Even a school ID or birth certificate helps)",
            "Documentation requirements",
        )),
        Resource::new(
            "shelter-2",
            "Transitional Living Program",
            "Long-term housing support for youth 18-21",
        )
        .in_categories(["Housing"])
        .with_eligibility(
            EligibilityCriteria::default()
                .age_between(18, 21)
                .duration(DurationBucket::LongTerm),
        )
        .with_phone("(555) 234-5678")
        .with_email("tlp@example.org")
        .with_hours("Mon-Fri 9am-5pm"),
        Resource::new(
            "food-1",
            "Youth Food Bank",
            "Free meals and groceries for youth in need",
        )
        .in_categories(["Food"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(25))
        .with_phone("(555) 345-6789")
        .with_address("456 Oak Avenue, City, State")
        .with_hours("Mon-Sat 10am-6pm"),
        Resource::new(
            "health-1",
            "Youth Health Clinic",
            "Free medical and mental health services",
        )
        .in_categories(["Healthcare"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 456-7890")
        .with_website("www.youthhealth.org")
        .with_hours("Mon-Fri 8am-8pm"),
        Resource::new(
            "education-1",
            "Education Support Center",
            "Help with school enrollment, GED prep, and college applications",
        )
        .in_categories(["Education"])
        .with_eligibility(EligibilityCriteria::default().in_school(true))
        .with_phone("(555) 567-8901")
        .with_email("education@example.org")
        .with_hours("Mon-Fri 9am-5pm"),
        Resource::new(
            "legal-1",
            "Youth Legal Aid",
            "Free legal assistance for youth issues",
        )
        .in_categories(["Legal"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 678-9012")
        .with_website("www.youthlegal.org")
        .with_hours("Mon-Fri 10am-4pm"),
        Resource::new(
            "job-1",
            "Youth Employment Program",
            "Job training, placement, and career counseling",
        )
        .in_categories(["Employment"])
        .with_eligibility(
            EligibilityCriteria::default()
                .age_between(16, 24)
                .has_income(false),
        )
        .with_phone("(555) 789-0123")
        .with_email("jobs@example.org")
        .with_hours("Mon-Fri 9am-5pm"),
        Resource::new(
            "id-1",
            "ID Assistance Program",
            "Help obtaining identification documents",
        )
        .in_categories(["Documentation"])
        .with_eligibility(EligibilityCriteria::default().has_id(false))
        .with_phone("(555) 890-1234")
        .with_address("789 Pine Street, City, State")
        .with_hours("Mon-Fri 10am-3pm"),
        Resource::new(
            "transport-1",
            "Transportation Assistance Program",
            "Free bus passes, gas vouchers, and ride assistance for youth in crisis",
        )
        .in_categories(["Transportation"])
        .with_eligibility(
            EligibilityCriteria::default()
                .age_at_most(24)
                .for_situations(["homeless", "at-risk", "car", "transportation"]),
        )
        .with_phone("(555) 901-2345")
        .with_email("transport@youthservices.org")
        .with_hours("Mon-Fri 9am-5pm, Emergency: 24/7")
        .with_notes(
            "Can provide immediate bus passes and gas vouchers. No ID required for emergency assistance.",
        )
        .with_priority(Priority::High)
        .offering([
            "Free bus passes (weekly or monthly)",
            "Gas vouchers if you have a car",
            "Emergency ride assistance",
            "Help with public transportation navigation",
            "No ID required for emergency help",
        ])
        .with_barriers([
            "Need to pick up passes in person",
            "Limited hours for non-emergency requests",
            "May need to show proof of need",
        ])
        .with_follow_up(FollowUpQuestion::multiple_choice(
            "transport-need",
            "transportNeedType",
            "What kind of transportation help do you need most?",
            [
                "Bus passes for public transportation",
                "Gas money/vouchers",
                "Emergency ride to a specific place",
                "Help learning the bus system",
                "Multiple types of help",
            ],
            "Type of transportation need",
        ))
        .with_follow_up(FollowUpQuestion::multiple_choice(
            "transport-urgency",
            "transportUrgency",
            "How soon do you need transportation help?",
            [
                "Right now - emergency",
                "Today or tomorrow",
                "This week",
                "Ongoing support",
            ],
            "Timing/urgency",
        )),
        Resource::new(
            "food-2",
            "Emergency Food Assistance",
            "Immediate food support - meals, groceries, and food vouchers",
        )
        .in_categories(["Food"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(25))
        .with_phone("(555) 012-3456")
        .with_address("321 Elm Street, City, State")
        .with_hours("Daily 8am-8pm")
        .with_notes(
            "Walk-ins welcome. No questions asked. Provides hot meals and take-home groceries.",
        )
        .with_priority(Priority::High)
        .offering([
            "Hot meals served daily",
            "Take-home groceries",
            "Food vouchers for local stores",
            "No questions asked - just show up",
            "No ID required",
            "Can come multiple times per week",
        ])
        .with_barriers([
            "Transportation to the food bank",
            "Storage space for groceries (if living in car)",
            "Cooking facilities (if you need to prepare food)",
        ])
        .with_follow_up(FollowUpQuestion::yes_no(
            "food-transport",
            "canGetToFoodBank",
            "Can you get to the food bank location?",
            "Transportation to food bank",
        ))
        .with_follow_up(FollowUpQuestion::yes_no(
            "food-storage",
            "hasFoodStorage",
            "Do you have a place to store food? (Refrigerator, cooler, etc.)",
            "Food storage",
        )),
        Resource::new(
            "education-2",
            "McKinney-Vento Education Rights",
            "School enrollment help, transportation to school, and free school meals for homeless youth",
        )
        .in_categories(["Education"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(21))
        .with_phone("(555) 123-4560")
        .with_website("www.schoolsupport.org")
        .with_email("mckinneyvento@schools.org")
        .with_hours("Mon-Fri 8am-6pm")
        .with_notes(
            "Federal law guarantees immediate school enrollment and transportation even without permanent address. Can enroll same day.",
        )
        .with_priority(Priority::High),
        Resource::new(
            "housing-3",
            "Rapid Re-Housing for Youth",
            "Quick housing placement with minimal barriers - helps with deposits and first month rent",
        )
        .in_categories(["Housing"])
        .with_eligibility(
            EligibilityCriteria::default()
                .age_between(18, 24)
                .for_situations(["homeless", "car", "unsheltered"]),
        )
        .with_phone("(555) 234-5671")
        .with_email("rapidrehousing@housing.org")
        .with_hours("Mon-Fri 9am-5pm")
        .with_notes(
            "Can start process over phone. Helps with housing search, applications, and move-in costs.",
        )
        .with_priority(Priority::High),
        Resource::new(
            "multi-1",
            "Youth Resource Center",
            "One-stop center offering food, showers, laundry, case management, and resource navigation",
        )
        .in_categories(["Multi-Service"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 345-6782")
        .with_address("555 Youth Way, City, State")
        .with_website("www.youthresource.org")
        .with_hours("Mon-Sat 9am-7pm")
        .with_notes(
            "Drop-in center. No appointment needed. Can help with multiple needs in one visit.",
        )
        .with_priority(Priority::High)
        .offering([
            "Free meals and snacks",
            "Showers and laundry facilities",
            "Case management and support",
            "Help navigating other resources",
            "Computer and internet access",
            "Basic supplies (hygiene, clothing)",
            "No appointment needed - just drop in",
        ])
        .with_barriers([
            "Transportation to the center",
            "Limited hours (closed Sundays)",
            "May be busy during peak times",
        ])
        .with_follow_up(FollowUpQuestion::yes_no(
            "multi-transport",
            "canGetToCenter",
            "Can you get to the resource center?",
            "Transportation to center",
        ))
        .with_follow_up(FollowUpQuestion::yes_no(
            "multi-time",
            "availableDuringHours",
            "Are you available during their hours? (Mon-Sat 9am-7pm)",
            "Availability during center hours",
        )),
        Resource::new(
            "benefits-1",
            "Benefits Navigation",
            "Help applying for CalFresh (food stamps), Medi-Cal, and other benefits",
        )
        .in_categories(["Benefits"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 456-7893")
        .with_email("benefits@youthservices.org")
        .with_hours("Mon-Fri 10am-4pm")
        .with_notes(
            "Can help you apply for multiple benefits at once. Phone or in-person assistance available.",
        )
        .with_priority(Priority::Medium),
        Resource::new(
            "crisis-1",
            "24/7 Youth Crisis Line",
            "Immediate support, safety planning, and crisis intervention",
        )
        .in_categories(["Crisis Support"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 567-8904")
        .with_website("www.youthcrisis.org")
        .with_hours("24/7")
        .with_notes(
            "Available anytime. Can help with immediate safety needs, emotional support, and connecting to resources.",
        )
        .with_priority(Priority::High),
        Resource::new(
            "comprehensive-center",
            "Youth Comprehensive Support Center",
            "Multi-service center providing housing assistance, food programs, and crisis support in one location",
        )
        .in_categories(["Housing", "Food", "Crisis Support"])
        .with_eligibility(EligibilityCriteria::default().age_at_most(24))
        .with_phone("(555) 999-1111")
        .with_phone("(555) 999-2222")
        .with_email("help@youthcenter.org")
        .with_address("100 Youth Support Way, City, State")
        .with_hours("Mon-Fri 8am-8pm, Crisis Line: 24/7")
        .with_notes(
            "Comprehensive center serving multiple needs. Call main line during business hours, crisis line anytime.",
        )
        .with_priority(Priority::High)
        .offering([
            "Emergency housing assistance",
            "Daily meals and food pantry",
            "Crisis counseling and support",
            "Case management services",
            "Resource navigation and referrals",
        ])
        .with_barriers([
            "Transportation to center",
            "May have waiting lists for some services",
        ]),
    ]
}
