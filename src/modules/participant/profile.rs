use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::types::ParticipantId;
use crate::modules::participant::relationship::{Relationship, RelationshipType};

pub type AttributeValue = u8;

pub const ATTRIBUTE_MIN: AttributeValue = 1;
pub const ATTRIBUTE_MAX: AttributeValue = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub general: AttributeValue,
    pub physical: AttributeValue,
    pub endurance: AttributeValue,
    pub mental_quiz: AttributeValue,
    pub strategic: AttributeValue,
    pub loyalty: AttributeValue,
    pub social: AttributeValue,
    pub temperament: AttributeValue,
}

impl Attributes {
    pub fn new() -> Self {
        Self {
            general: 3,
            physical: 3,
            endurance: 3,
            mental_quiz: 3,
            strategic: 3,
            loyalty: 3,
            social: 3,
            temperament: 3,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let attributes = [
            ("general", self.general),
            ("physical", self.physical),
            ("endurance", self.endurance),
            ("mentalQuiz", self.mental_quiz),
            ("strategic", self.strategic),
            ("loyalty", self.loyalty),
            ("social", self.social),
            ("temperament", self.temperament),
        ];

        for (name, value) in attributes {
            if !(ATTRIBUTE_MIN..=ATTRIBUTE_MAX).contains(&value) {
                return Err(format!(
                    "Attribute '{}' has value {}, but must be between {} and {}",
                    name, value, ATTRIBUTE_MIN, ATTRIBUTE_MAX
                ));
            }
        }

        Ok(())
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    Mastermind,
    SocialButterfly,
    Villain,
    CompBeast,
    #[default]
    Floater,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Mastermind,
        Archetype::SocialButterfly,
        Archetype::Villain,
        Archetype::CompBeast,
        Archetype::Floater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Mastermind => "mastermind",
            Archetype::SocialButterfly => "social-butterfly",
            Archetype::Villain => "villain",
            Archetype::CompBeast => "comp-beast",
            Archetype::Floater => "floater",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Personality {
    pub archetype: Archetype,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub background: String,
}

impl Personality {
    pub fn new(archetype: Archetype, background: impl Into<String>) -> Self {
        Self {
            archetype,
            traits: Vec::new(),
            background: background.into(),
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }
}

/// Game status, written by the phase state machine and only read here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantStatus {
    pub is_hoh: bool,
    pub is_nominated: bool,
    pub has_pov: bool,
    pub is_evicted: bool,
    pub is_player_controlled: bool,
    pub hoh_wins: u32,
    pub pov_wins: u32,
    pub alliances: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub personality: Personality,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub status: ParticipantStatus,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Attributes::default(),
            personality: Personality::default(),
            relationships: Vec::new(),
            status: ParticipantStatus::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.retain(|r| r.target_id != relationship.target_id);
        self.relationships.push(relationship);
        self
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn relationship_with(&self, other_id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.target_id == other_id)
    }

    /// Missing relationships read as `Neutral`.
    pub fn relationship_type_with(&self, other_id: &str) -> RelationshipType {
        self.relationship_with(other_id)
            .map(|r| r.relationship_type)
            .unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_evicted
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err(format!("Participant '{}' has an empty ID", self.name));
        }
        self.attributes
            .validate()
            .map_err(|e| format!("Participant {}: {}", self.id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_default_is_valid() {
        let attributes = Attributes::default();
        assert_eq!(attributes.strategic, 3);
        assert!(attributes.validate().is_ok());
    }

    #[test]
    fn test_attributes_out_of_range() {
        let mut attributes = Attributes::new();
        attributes.loyalty = 6;
        let err = attributes.validate().unwrap_err();
        assert!(err.contains("loyalty"));

        attributes.loyalty = 0;
        assert!(attributes.validate().is_err());
    }

    #[test]
    fn test_archetype_serde_names() {
        let json = serde_json::to_string(&Archetype::SocialButterfly).unwrap();
        assert_eq!(json, "\"social-butterfly\"");

        let parsed: Archetype = serde_json::from_str("\"comp-beast\"").unwrap();
        assert_eq!(parsed, Archetype::CompBeast);
        assert_eq!(Archetype::default(), Archetype::Floater);
    }

    #[test]
    fn test_relationship_lookup_defaults_to_neutral() {
        let participant = Participant::new("hg-1", "Avery")
            .with_relationship(Relationship::new("hg-2", RelationshipType::Ally));

        assert_eq!(participant.relationship_type_with("hg-2"), RelationshipType::Ally);
        assert_eq!(participant.relationship_type_with("hg-3"), RelationshipType::Neutral);
    }

    #[test]
    fn test_with_relationship_replaces_existing() {
        let participant = Participant::new("hg-1", "Avery")
            .with_relationship(Relationship::new("hg-2", RelationshipType::Friend))
            .with_relationship(Relationship::new("hg-2", RelationshipType::Enemy));

        assert_eq!(participant.relationships.len(), 1);
        assert_eq!(participant.relationship_type_with("hg-2"), RelationshipType::Enemy);
    }

    #[test]
    fn test_participant_deserializes_with_defaults() {
        let participant: Participant = serde_json::from_str(r#"{"id": "hg-9", "name": "Quinn"}"#).unwrap();
        assert_eq!(participant.personality.archetype, Archetype::Floater);
        assert!(participant.relationships.is_empty());
        assert!(participant.is_active());
        assert!(participant.validate().is_ok());
    }
}
