use serde::{Deserialize, Serialize};

use crate::api::types::{GamePhase, ParticipantId};
use crate::modules::storyline::{EventType, StoryEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Competition,
    Strategy,
    Social,
    Personal,
    Twist,
}

impl EventCategory {
    pub const ORDER: [EventCategory; 5] = [
        EventCategory::Competition,
        EventCategory::Strategy,
        EventCategory::Social,
        EventCategory::Personal,
        EventCategory::Twist,
    ];

    pub fn from_event_type(event_type: EventType) -> Self {
        match event_type {
            EventType::Competition => EventCategory::Competition,
            EventType::Social => EventCategory::Social,
            EventType::Twist => EventCategory::Twist,
            EventType::Diary => EventCategory::Personal,
            EventType::Alliance => EventCategory::Strategy,
        }
    }

    pub fn of(event: &StoryEvent) -> Self {
        Self::from_event_type(event.event_type)
    }

    pub fn default_priority(&self) -> f32 {
        match self {
            EventCategory::Twist => 4.0,
            EventCategory::Competition | EventCategory::Strategy => 3.0,
            EventCategory::Social => 2.0,
            EventCategory::Personal => 1.0,
        }
    }

    pub fn rank(&self) -> usize {
        Self::ORDER.iter().position(|c| c == self).unwrap_or(Self::ORDER.len())
    }
}

/// Larger of the strongest relationship effect and the heaviest option importance.
pub fn priority_level(event: &StoryEvent) -> f32 {
    (event.max_effect_magnitude() as f32).max(event.max_option_importance())
}

/// Every criterion that is set must hold.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub categories: Option<Vec<EventCategory>>,
    pub min_priority: Option<f32>,
    pub max_priority: Option<f32>,
    pub phase: Option<GamePhase>,
    pub participant_id: Option<ParticipantId>,
    pub exclude_completed: bool,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = EventCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn with_priority_range(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.min_priority = min;
        self.max_priority = max;
        self
    }

    pub fn in_phase(mut self, phase: GamePhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn for_participant(mut self, participant_id: impl Into<ParticipantId>) -> Self {
        self.participant_id = Some(participant_id.into());
        self
    }

    pub fn excluding_completed(mut self) -> Self {
        self.exclude_completed = true;
        self
    }

    pub fn matches(&self, event: &StoryEvent) -> bool {
        if let Some(categories) = &self.categories {
            if !categories.contains(&EventCategory::of(event)) {
                return false;
            }
        }

        let level = priority_level(event);
        if self.min_priority.map(|min| level < min).unwrap_or(false) {
            return false;
        }
        if self.max_priority.map(|max| level > max).unwrap_or(false) {
            return false;
        }

        if let Some(phase) = self.phase {
            if !event.occurs_in(phase) {
                return false;
            }
        }

        if let Some(participant_id) = &self.participant_id {
            if event.target_id() != Some(participant_id.as_str()) {
                return false;
            }
        }

        !(self.exclude_completed && event.is_complete)
    }

    pub fn apply<'a, I>(&self, events: I) -> Vec<&'a StoryEvent>
    where
        I: IntoIterator<Item = &'a StoryEvent>,
    {
        events.into_iter().filter(|event| self.matches(event)).collect()
    }
}
