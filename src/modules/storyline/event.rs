//! Presentable story events and their choices.
//!
//! An event is either a single-shot event from one of the generators or one
//! numbered stage of a storyline (`storyline_id` and `sequence` both set).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::types::{GamePhase, ParticipantId};
use crate::modules::participant::RelationshipType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Competition,
    Social,
    Twist,
    Diary,
    Alliance,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Competition => "competition",
            EventType::Social => "social",
            EventType::Twist => "twist",
            EventType::Diary => "diary",
            EventType::Alliance => "alliance",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub consequence: String,
    #[serde(default)]
    pub relationship_effect: i32,
    #[serde(default)]
    pub memory_importance: f32,
    /// Set when choosing this option continues the storyline.
    #[serde(default)]
    pub next_event_id: Option<String>,
}

impl EventOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            consequence: String::new(),
            relationship_effect: 0,
            memory_importance: 1.0,
            next_event_id: None,
        }
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequence = consequence.into();
        self
    }

    pub fn with_effect(mut self, relationship_effect: i32, memory_importance: f32) -> Self {
        self.relationship_effect = relationship_effect;
        self.memory_importance = memory_importance;
        self
    }

    pub fn leads_to(mut self, next_event_id: impl Into<String>) -> Self {
        self.next_event_id = Some(next_event_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequirement {
    pub participant_id: ParticipantId,
    #[serde(default)]
    pub relationship: Option<RelationshipType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseFrequency {
    pub phase: GamePhase,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub options: Vec<EventOption>,
    #[serde(default)]
    pub requires: Option<EventRequirement>,
    #[serde(default)]
    pub storyline_id: Option<String>,
    #[serde(default)]
    pub sequence: Option<u32>,
    /// Set once the event has been resolved.
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub frequency: Vec<PhaseFrequency>,
}

impl StoryEvent {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        event_type: EventType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            event_type,
            options: Vec::new(),
            requires: None,
            storyline_id: None,
            sequence: None,
            is_complete: false,
            frequency: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: EventOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn targeting(mut self, participant_id: impl Into<ParticipantId>) -> Self {
        self.requires = Some(EventRequirement {
            participant_id: participant_id.into(),
            relationship: None,
        });
        self
    }

    pub fn requiring_relationship(mut self, participant_id: impl Into<ParticipantId>, relationship: RelationshipType) -> Self {
        self.requires = Some(EventRequirement {
            participant_id: participant_id.into(),
            relationship: Some(relationship),
        });
        self
    }

    pub fn in_storyline(mut self, storyline_id: impl Into<String>, sequence: u32) -> Self {
        self.storyline_id = Some(storyline_id.into());
        self.sequence = Some(sequence);
        self
    }

    pub fn with_frequency(mut self, phase: GamePhase, probability: f32) -> Self {
        self.frequency.retain(|f| f.phase != phase);
        self.frequency.push(PhaseFrequency { phase, probability });
        self
    }

    pub fn in_every_phase(mut self, probability: f32) -> Self {
        for phase in GamePhase::ALL {
            self = self.with_frequency(phase, probability);
        }
        self
    }

    pub fn option(&self, choice_id: &str) -> Option<&EventOption> {
        self.options.iter().find(|o| o.id == choice_id)
    }

    pub fn target_id(&self) -> Option<&str> {
        self.requires.as_ref().map(|r| r.participant_id.as_str())
    }

    /// Zero when the phase is not listed.
    pub fn phase_probability(&self, phase: GamePhase) -> f32 {
        self.frequency
            .iter()
            .find(|f| f.phase == phase)
            .map(|f| f.probability)
            .unwrap_or(0.0)
    }

    pub fn occurs_in(&self, phase: GamePhase) -> bool {
        self.phase_probability(phase) > 0.0
    }

    pub fn max_effect_magnitude(&self) -> i32 {
        self.options
            .iter()
            .map(|o| o.relationship_effect.abs())
            .max()
            .unwrap_or(0)
    }

    pub fn max_option_importance(&self) -> f32 {
        self.options
            .iter()
            .map(|o| o.memory_importance)
            .fold(0.0, f32::max)
    }

    pub fn is_storyline_stage(&self) -> bool {
        self.storyline_id.is_some()
    }
}
