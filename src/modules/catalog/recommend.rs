use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::api::types::GamePhase;
use crate::modules::catalog::filter::EventCategory;
use crate::modules::participant::Participant;
use crate::modules::scoring::relationship_strength;
use crate::modules::storyline::{EventType, StoryEvent};

const PHASE_WEIGHT: f32 = 0.4;
const MOOD_WEIGHT: f32 = 0.25;
const URGENCY_WEIGHT: f32 = 0.2;
const RELATIONSHIP_WEIGHT: f32 = 0.15;

/// Relationship strength spans roughly [-2, 2] before normalisation.
const STRENGTH_RANGE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Anxious,
    Angry,
    Confident,
    Sad,
    #[default]
    Neutral,
}

impl Mood {
    /// How much a player in this mood wants events of the given category, in [0, 1].
    pub fn affinity(&self, category: EventCategory) -> f32 {
        use EventCategory::*;
        match (self, category) {
            (Mood::Happy, Social) => 1.0,
            (Mood::Happy, Competition) => 0.6,
            (Mood::Anxious, Strategy) => 1.0,
            (Mood::Anxious, Personal) => 0.7,
            (Mood::Angry, Competition) => 1.0,
            (Mood::Angry, Twist) => 0.7,
            (Mood::Confident, Strategy) => 0.8,
            (Mood::Confident, Competition) => 0.9,
            (Mood::Sad, Personal) => 1.0,
            (Mood::Sad, Social) => 0.6,
            (Mood::Neutral, _) => 0.5,
            _ => 0.2,
        }
    }
}

pub struct RecommendationContext<'a> {
    pub phase: GamePhase,
    pub mood: Mood,
    pub player: &'a Participant,
}

impl<'a> RecommendationContext<'a> {
    pub fn new(player: &'a Participant, phase: GamePhase) -> Self {
        Self {
            phase,
            mood: Mood::default(),
            player,
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    /// Nominees lean towards strategy events; the HoH towards alliance events.
    fn urgency(&self, event: &StoryEvent) -> f32 {
        let status = &self.player.status;
        let category = EventCategory::of(event);

        if status.is_nominated && category == EventCategory::Strategy {
            return 1.0;
        }
        if status.is_hoh && event.event_type == EventType::Alliance {
            return 1.0;
        }
        if status.is_nominated || status.is_hoh {
            return 0.2;
        }
        0.5
    }

    /// Normalised into [0, 1]; events without a target score the midpoint.
    fn relationship(&self, event: &StoryEvent) -> f32 {
        let strength = event
            .target_id()
            .and_then(|id| self.player.relationship_with(id))
            .map(relationship_strength)
            .unwrap_or(0.0);
        ((strength + STRENGTH_RANGE) / (2.0 * STRENGTH_RANGE)).clamp(0.0, 1.0)
    }

    pub fn score(&self, event: &StoryEvent) -> f32 {
        PHASE_WEIGHT * event.phase_probability(self.phase)
            + MOOD_WEIGHT * self.mood.affinity(EventCategory::of(event))
            + URGENCY_WEIGHT * self.urgency(event)
            + RELATIONSHIP_WEIGHT * self.relationship(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredEvent<'a> {
    pub event: &'a StoryEvent,
    pub score: f32,
}

/// Highest score first; ties keep input order.
pub fn recommend<'a, I>(events: I, context: &RecommendationContext<'_>) -> Vec<ScoredEvent<'a>>
where
    I: IntoIterator<Item = &'a StoryEvent>,
{
    let mut scored: Vec<ScoredEvent<'a>> = events
        .into_iter()
        .map(|event| ScoredEvent {
            event,
            score: context.score(event),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}
