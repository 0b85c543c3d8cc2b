use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Family,
    Friend,
    Colleague,
    Acquaintance,
    Other,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 5] = [
        Self::Family,
        Self::Friend,
        Self::Colleague,
        Self::Acquaintance,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Family => "Family",
            Self::Friend => "Friend",
            Self::Colleague => "Colleague",
            Self::Acquaintance => "Acquaintance",
            Self::Other => "Other",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Family => "#FF6B6B",
            Self::Friend => "#6C5CE7",
            Self::Colleague => "#00D2FF",
            Self::Acquaintance => "#FFD740",
            Self::Other => "#9090A8",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
    InPerson,
    Call,
    Text,
    Video,
    SocialMedia,
    Email,
}

impl InteractionType {
    pub fn label(self) -> &'static str {
        match self {
            Self::InPerson => "In Person",
            Self::Call => "Phone Call",
            Self::Text => "Text",
            Self::Video => "Video Call",
            Self::SocialMedia => "Social Media",
            Self::Email => "Email",
        }
    }
}

pub fn closeness_label(level: u8) -> &'static str {
    match level {
        1 => "Distant",
        2 => "Casual",
        4 => "Close",
        5 => "Very Close",
        _ => "Regular",
    }
}

pub fn sentiment_label(sentiment: u8) -> &'static str {
    match sentiment {
        1 => "Very Negative",
        2 => "Negative",
        4 => "Positive",
        5 => "Very Positive",
        _ => "Neutral",
    }
}

/// Hex color for a 1..=5 sentiment; anything out of range renders neutral.
pub fn sentiment_color(sentiment: u8) -> &'static str {
    match sentiment {
        1 => "#FF5252",
        2 => "#FF6E40",
        3 => "#FFD740",
        4 => "#69F0AE",
        5 => "#00E676",
        _ => "#FFD740",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub relationship_type: RelationshipType,
    pub closeness_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl Person {
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sentiment: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Snapshot {
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    /// Re-resolves denormalized interaction participants against the people
    /// list, dropping participants whose id no longer exists, and clamps
    /// rating fields to their 1..=5 domain.
    pub fn link_people(&mut self) {
        for person in &mut self.people {
            person.closeness_level = person.closeness_level.clamp(1, 5);
        }

        let by_id = self
            .people
            .iter()
            .map(|person| (person.id.clone(), person.clone()))
            .collect::<std::collections::HashMap<_, _>>();

        for interaction in &mut self.interactions {
            interaction.sentiment = interaction.sentiment.clamp(1, 5);

            let before = interaction.people.len();
            interaction.people = interaction
                .people
                .iter()
                .filter_map(|stale| by_id.get(&stale.id).cloned())
                .collect();

            if interaction.people.len() < before {
                log::warn!(
                    "interaction {} lost {} unresolved participant(s)",
                    interaction.id,
                    before - interaction.people.len()
                );
            }
        }
    }
}
