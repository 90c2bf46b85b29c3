use serde::{Deserialize, Serialize};

/// Coarse distance between the user and a resource, closest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceTier {
    Exact,
    Nearby,
    /// Reserved; the current city tables never produce it.
    Regional,
    Statewide,
}

impl DistanceTier {
    pub const fn rank(self) -> u8 {
        match self {
            DistanceTier::Exact => 0,
            DistanceTier::Nearby => 1,
            DistanceTier::Regional => 2,
            DistanceTier::Statewide => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DistanceTier::Exact => "In your area",
            DistanceTier::Nearby => "Nearby",
            DistanceTier::Regional => "Regional",
            DistanceTier::Statewide => "Statewide",
        }
    }
}

pub fn distance_label(tier: Option<DistanceTier>) -> &'static str {
    tier.map(DistanceTier::label).unwrap_or("Other location")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetroArea {
    BayArea,
    LosAngeles,
    SanDiego,
    Sacramento,
}

impl MetroArea {
    pub const fn label(self) -> &'static str {
        match self {
            MetroArea::BayArea => "Bay Area",
            MetroArea::LosAngeles => "Los Angeles",
            MetroArea::SanDiego => "San Diego",
            MetroArea::Sacramento => "Sacramento",
        }
    }
}

const METRO_CITIES: &[(MetroArea, &[&str])] = &[
    (
        MetroArea::BayArea,
        &[
            "san francisco",
            "sf",
            "oakland",
            "san jose",
            "palo alto",
            "mountain view",
            "sunnyvale",
            "santa clara",
            "fremont",
            "hayward",
            "berkeley",
            "richmond",
            "san mateo",
            "redwood city",
            "daly city",
            "south san francisco",
        ],
    ),
    (
        MetroArea::LosAngeles,
        &[
            "los angeles",
            "la",
            "santa monica",
            "pasadena",
            "long beach",
            "glendale",
            "burbank",
            "inglewood",
            "compton",
            "torrance",
        ],
    ),
    (
        MetroArea::SanDiego,
        &["san diego", "chula vista", "oceanside", "carlsbad", "el cajon"],
    ),
    (
        MetroArea::Sacramento,
        &["sacramento", "elk grove", "roseville", "folsom"],
    ),
];

/// First metro bucket with a member name contained in `city`.
pub fn metro_of(city: &str) -> Option<MetroArea> {
    let city = city.trim().to_lowercase();
    if city.is_empty() {
        return None;
    }

    METRO_CITIES
        .iter()
        .find(|(_, members)| members.iter().any(|member| city.contains(member)))
        .map(|(metro, _)| *metro)
}

fn is_statewide(location: &str) -> bool {
    let location = location.trim().to_lowercase();
    location.contains("california") || location == "statewide"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMatch {
    pub matches: bool,
    /// `None` when no tier applies.
    pub tier: Option<DistanceTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LocationMatch {
    fn matched(tier: DistanceTier, reason: Option<String>) -> Self {
        Self {
            matches: true,
            tier: Some(tier),
            reason,
        }
    }
}

/// Scores `user_location` against a resource's served locations.
///
/// Tiers are tried closest first: substring match either way, then shared
/// metro bucket, then statewide coverage.
pub fn match_location(user_location: &str, resource_locations: &[String]) -> LocationMatch {
    let user = user_location.trim().to_lowercase();

    if !user.is_empty() {
        let exact = resource_locations.iter().any(|location| {
            let location = location.trim().to_lowercase();
            !location.is_empty() && (user.contains(&location) || location.contains(&user))
        });
        if exact {
            return LocationMatch::matched(DistanceTier::Exact, None);
        }

        if let Some(user_metro) = metro_of(&user) {
            let nearby = resource_locations
                .iter()
                .find(|location| metro_of(location) == Some(user_metro));
            if let Some(location) = nearby {
                return LocationMatch::matched(
                    DistanceTier::Nearby,
                    Some(format!(
                        "This resource is in {location} (nearby in {} area)",
                        user_metro.label()
                    )),
                );
            }
        }

        if resource_locations.iter().any(|location| is_statewide(location)) {
            return LocationMatch::matched(
                DistanceTier::Statewide,
                Some("This resource serves all of California".to_string()),
            );
        }
    }

    LocationMatch {
        matches: false,
        tier: None,
        reason: Some(format!(
            "This resource is only available in: {}",
            resource_locations.join(", ")
        )),
    }
}
