use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::types::ParticipantId;
use crate::config::StorylineConfig;
use crate::modules::memory::{memory_types, MemoryEntry, MemoryImpact, MemoryStore};
use crate::modules::participant::Roster;
use crate::modules::storyline::event::StoryEvent;
use crate::modules::storyline::generators::{generate_generic, TurnContext};
use crate::modules::storyline::stages::{self, StageContext};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorylineError {
    #[error("Unknown storyline: {0}")]
    UnknownStoryline(String),

    #[error("Storyline already active: {0}")]
    AlreadyActive(String),

    #[error("Storyline already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Storyline {0} needs a target participant")]
    NoTarget(String),

    #[error("No event is currently open")]
    NoOpenEvent,

    #[error("Event {0} is not the open event")]
    EventNotOpen(String),

    #[error("Event {event_id} has no choice {choice_id}")]
    UnknownChoice { event_id: String, choice_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStoryline {
    pub storyline_id: String,
    pub target_id: ParticipantId,
    pub target_name: String,
    pub current_sequence: u32,
    pub choices: BTreeMap<u32, String>,
}

impl ActiveStoryline {
    fn stage_context(&self, sequence: u32) -> StageContext {
        StageContext {
            storyline_id: self.storyline_id.clone(),
            sequence,
            target_id: self.target_id.clone(),
            target_name: self.target_name.clone(),
            prior_choices: self.choices.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Budget exhausted or the trigger roll failed.
    Idle,
    AdvancedStoryline { storyline_id: String, event_id: String },
    StartedStoryline { storyline_id: String, event_id: String },
    Generated { event_id: String },
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub event_id: String,
    pub choice_id: String,
    pub memory: Option<(ParticipantId, MemoryEntry)>,
    pub next_event_id: Option<String>,
    pub completed_storyline: Option<String>,
}

/// Resolved events kept for [`StorylineEngine::history`]; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 32;

/// Storyline state, the presentation queue and the single open slot.
#[derive(Debug, Clone, Default)]
pub struct StorylineEngine {
    config: StorylineConfig,
    queue: VecDeque<StoryEvent>,
    open: Option<StoryEvent>,
    active: HashMap<String, ActiveStoryline>,
    completed: HashSet<String>,
    history: Vec<StoryEvent>,
    day: u32,
    events_today: u32,
}

impl StorylineEngine {
    pub fn new(config: StorylineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &StorylineConfig {
        &self.config
    }

    pub fn start_storyline(
        &mut self,
        storyline_id: &str,
        target_id: &str,
        roster: &Roster,
    ) -> Result<String, StorylineError> {
        if !stages::is_known(storyline_id) {
            return Err(StorylineError::UnknownStoryline(storyline_id.to_string()));
        }
        if self.active.contains_key(storyline_id) {
            return Err(StorylineError::AlreadyActive(storyline_id.to_string()));
        }
        if self.completed.contains(storyline_id) {
            return Err(StorylineError::AlreadyCompleted(storyline_id.to_string()));
        }
        if target_id.is_empty() {
            return Err(StorylineError::NoTarget(storyline_id.to_string()));
        }

        let target_name = roster
            .get(target_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| target_id.to_string());

        let active = ActiveStoryline {
            storyline_id: storyline_id.to_string(),
            target_id: target_id.to_string(),
            target_name,
            current_sequence: 1,
            choices: BTreeMap::new(),
        };

        let event = stages::build_stage(&active.stage_context(1))
            .ok_or_else(|| StorylineError::UnknownStoryline(storyline_id.to_string()))?;
        let event_id = event.id.clone();

        info!(storyline_id, target_id, "Storyline started");
        self.active.insert(storyline_id.to_string(), active);
        self.queue.push_back(event);
        Ok(event_id)
    }

    pub fn enqueue(&mut self, event: StoryEvent) {
        debug!(event_id = %event.id, event_type = %event.event_type, "Event queued");
        self.queue.push_back(event);
    }

    /// Opens the front of the queue when nothing is open. Returns the open event.
    pub fn present_next(&mut self) -> Option<&StoryEvent> {
        if self.open.is_none() {
            self.open = self.queue.pop_front();
        }
        self.open.as_ref()
    }

    /// One turn of randomized triggering. Produces at most one new event.
    pub fn take_turn<R: Rng + ?Sized>(&mut self, context: &TurnContext, roster: &Roster, rng: &mut R) -> TurnOutcome {
        if context.actions_remaining < self.config.min_actions_remaining
            || self.events_today > self.config.max_events_per_day
        {
            return TurnOutcome::Idle;
        }

        let probability = self.config.trigger_probability(context.phase, context.day_count);
        if rng.gen::<f32>() >= probability {
            return TurnOutcome::Idle;
        }

        let outcome = match self.advance_or_start(context, roster, rng) {
            Some(outcome) => outcome,
            None => match generate_generic(context, roster, &self.config.generator_weights, rng) {
                Some(event) => {
                    let event_id = event.id.clone();
                    self.enqueue(event);
                    TurnOutcome::Generated { event_id }
                }
                None => return TurnOutcome::Idle,
            },
        };

        self.events_today += 1;
        outcome
    }

    fn advance_or_start<R: Rng + ?Sized>(
        &mut self,
        context: &TurnContext,
        roster: &Roster,
        rng: &mut R,
    ) -> Option<TurnOutcome> {
        if !self.active.is_empty() {
            if rng.gen::<f32>() < self.config.advance_chance {
                return self.prioritise_active_stage();
            }
            return None;
        }

        if rng.gen::<f32>() >= self.config.start_chance {
            return None;
        }

        let available: Vec<&str> = stages::STORYLINES
            .iter()
            .map(|s| s.id)
            .filter(|id| !self.completed.contains(*id))
            .collect();
        let storyline_id = *available.choose(rng)?;
        let target = *roster.others(&context.player_id).choose(rng)?;

        self.start_storyline(storyline_id, &target.id, roster)
            .ok()
            .map(|event_id| TurnOutcome::StartedStoryline {
                storyline_id: storyline_id.to_string(),
                event_id,
            })
    }

    /// Moves the first queued stage of an active storyline to the queue front.
    fn prioritise_active_stage(&mut self) -> Option<TurnOutcome> {
        let position = self.queue.iter().position(|event| {
            event
                .storyline_id
                .as_deref()
                .map(|id| self.active.contains_key(id))
                .unwrap_or(false)
        })?;

        let event = self.queue.remove(position)?;
        let outcome = TurnOutcome::AdvancedStoryline {
            storyline_id: event.storyline_id.clone().unwrap_or_default(),
            event_id: event.id.clone(),
        };
        self.queue.push_front(event);
        Some(outcome)
    }

    pub fn resolve_choice(
        &mut self,
        memory: &mut MemoryStore,
        event_id: &str,
        choice_id: &str,
        actor_id: &str,
        week: u32,
    ) -> Result<Resolution, StorylineError> {
        let event = self.open.as_ref().ok_or(StorylineError::NoOpenEvent)?;
        if event.id != event_id {
            return Err(StorylineError::EventNotOpen(event_id.to_string()));
        }
        let option = event
            .option(choice_id)
            .ok_or_else(|| StorylineError::UnknownChoice {
                event_id: event_id.to_string(),
                choice_id: choice_id.to_string(),
            })?
            .clone();

        let written = event.requires.as_ref().map(|requirement| {
            let memory_type = if event.is_storyline_stage() {
                memory_types::STORYLINE
            } else {
                event.event_type.as_str()
            };
            let outcome = if option.consequence.is_empty() {
                &option.text
            } else {
                &option.consequence
            };
            let impact = MemoryImpact::from_effect(option.relationship_effect);
            let entry = MemoryEntry::new(memory_type, week, format!("{}: {}", event.title, outcome), option.memory_importance)
                .with_impact(impact)
                .with_related(actor_id);
            let stored = memory.add_entry(&requirement.participant_id, entry);
            (requirement.participant_id.clone(), stored)
        });

        let (next_event_id, completed_storyline) = match (event.storyline_id.clone(), event.sequence) {
            (Some(storyline_id), Some(sequence)) => self.advance_storyline(&storyline_id, sequence, &option.id, option.next_event_id.is_some()),
            _ => (None, None),
        };

        if let Some(mut closed) = self.open.take() {
            closed.is_complete = true;
            self.history.push(closed);
            if self.history.len() > HISTORY_LIMIT {
                let overflow = self.history.len() - HISTORY_LIMIT;
                self.history.drain(..overflow);
            }
        }

        Ok(Resolution {
            event_id: event_id.to_string(),
            choice_id: choice_id.to_string(),
            memory: written,
            next_event_id,
            completed_storyline,
        })
    }

    fn advance_storyline(
        &mut self,
        storyline_id: &str,
        sequence: u32,
        choice_id: &str,
        continues: bool,
    ) -> (Option<String>, Option<String>) {
        let Some(active) = self.active.get_mut(storyline_id) else {
            return (None, None);
        };
        active.choices.insert(sequence, choice_id.to_string());

        if continues {
            if let Some(next) = stages::build_stage(&active.stage_context(sequence + 1)) {
                active.current_sequence = sequence + 1;
                let next_id = next.id.clone();
                info!(storyline_id, sequence = sequence + 1, "Storyline advanced");
                self.queue.push_back(next);
                return (Some(next_id), None);
            }
        }

        self.active.remove(storyline_id);
        self.completed.insert(storyline_id.to_string());
        info!(storyline_id, "Storyline completed");
        (None, Some(storyline_id.to_string()))
    }

    pub fn begin_day(&mut self, day: u32) {
        self.day = day;
        self.events_today = 0;
    }

    pub fn reset(&mut self) {
        self.queue.clear();
        self.open = None;
        self.active.clear();
        self.completed.clear();
        self.history.clear();
        self.events_today = 0;
    }

    pub fn queued_events(&self) -> impl Iterator<Item = &StoryEvent> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn open_event(&self) -> Option<&StoryEvent> {
        self.open.as_ref()
    }

    pub fn active_storylines(&self) -> impl Iterator<Item = &ActiveStoryline> {
        self.active.values()
    }

    pub fn active_storyline(&self, storyline_id: &str) -> Option<&ActiveStoryline> {
        self.active.get(storyline_id)
    }

    pub fn completed_storylines(&self) -> &HashSet<String> {
        &self.completed
    }

    pub fn is_active(&self, storyline_id: &str) -> bool {
        self.active.contains_key(storyline_id)
    }

    pub fn is_completed(&self, storyline_id: &str) -> bool {
        self.completed.contains(storyline_id)
    }

    /// The most recent resolved events, oldest first.
    pub fn history(&self) -> &[StoryEvent] {
        &self.history
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn events_today(&self) -> u32 {
        self.events_today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_test_mock::fixtures::{test_roster, RosterFixture};
    use crate::api::types::GamePhase;
    use crate::modules::storyline::event::{EventOption, EventType};
    use crate::modules::storyline::stages::{SHOWMANCE, WHISPER_CAMPAIGN};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always_trigger() -> StorylineConfig {
        let mut config = StorylineConfig::default();
        config.phase_probabilities.social = 1.0;
        config
    }

    #[test]
    fn test_present_next_keeps_single_open_event() {
        let mut engine = StorylineEngine::default();
        engine.enqueue(StoryEvent::new("a", "A", "", EventType::Diary).with_option(EventOption::new("ok", "Ok")));
        engine.enqueue(StoryEvent::new("b", "B", "", EventType::Diary));

        assert_eq!(engine.present_next().unwrap().id, "a");
        assert_eq!(engine.present_next().unwrap().id, "a");
        assert_eq!(engine.queue_len(), 1);

        let mut memory = MemoryStore::new();
        engine.resolve_choice(&mut memory, "a", "ok", RosterFixture::PLAYER, 1).unwrap();
        assert!(engine.open_event().is_none());
        assert_eq!(engine.present_next().unwrap().id, "b");
        assert!(engine.history()[0].is_complete);
    }

    #[test]
    fn test_resolve_requires_open_event() {
        let mut engine = StorylineEngine::default();
        let mut memory = MemoryStore::new();
        assert_eq!(
            engine.resolve_choice(&mut memory, "x", "y", "p", 1).unwrap_err(),
            StorylineError::NoOpenEvent
        );

        engine.enqueue(StoryEvent::new("a", "A", "", EventType::Diary));
        engine.present_next();
        assert_eq!(
            engine.resolve_choice(&mut memory, "b", "y", "p", 1).unwrap_err(),
            StorylineError::EventNotOpen("b".to_string())
        );
        assert!(matches!(
            engine.resolve_choice(&mut memory, "a", "nope", "p", 1),
            Err(StorylineError::UnknownChoice { .. })
        ));
        assert!(engine.open_event().is_some());
    }

    #[test]
    fn test_unknown_storyline_rejected() {
        let mut engine = StorylineEngine::default();
        assert_eq!(
            engine.start_storyline("alien_invasion", RosterFixture::SOCIAL, &test_roster()),
            Err(StorylineError::UnknownStoryline("alien_invasion".to_string()))
        );
        assert_eq!(
            engine.start_storyline(SHOWMANCE, "", &test_roster()),
            Err(StorylineError::NoTarget(SHOWMANCE.to_string()))
        );
    }

    #[test]
    fn test_branch_ending_completes_early() {
        let roster = test_roster();
        let mut engine = StorylineEngine::default();
        let mut memory = MemoryStore::new();

        let first = engine.start_storyline(WHISPER_CAMPAIGN, RosterFixture::VILLAIN, &roster).unwrap();
        engine.present_next();
        let resolution = engine
            .resolve_choice(&mut memory, &first, "ignore", RosterFixture::PLAYER, 2)
            .unwrap();

        assert_eq!(resolution.completed_storyline.as_deref(), Some(WHISPER_CAMPAIGN));
        assert!(resolution.next_event_id.is_none());
        assert!(engine.is_completed(WHISPER_CAMPAIGN));
        assert_eq!(engine.queue_len(), 0);
    }

    #[test]
    fn test_resolution_records_choice_for_next_stage() {
        let roster = test_roster();
        let mut engine = StorylineEngine::default();
        let mut memory = MemoryStore::new();

        let first = engine.start_storyline(SHOWMANCE, RosterFixture::COMP_BEAST, &roster).unwrap();
        engine.present_next();
        let resolution = engine
            .resolve_choice(&mut memory, &first, "flirt", RosterFixture::PLAYER, 1)
            .unwrap();

        assert_eq!(resolution.next_event_id.as_deref(), Some("showmance-2"));
        let active = engine.active_storyline(SHOWMANCE).unwrap();
        assert_eq!(active.current_sequence, 2);
        assert_eq!(active.choices.get(&1).map(String::as_str), Some("flirt"));

        let (target, entry) = resolution.memory.unwrap();
        assert_eq!(target, RosterFixture::COMP_BEAST);
        assert_eq!(entry.memory_type, memory_types::STORYLINE);
        assert_eq!(entry.related_participant_id.as_deref(), Some(RosterFixture::PLAYER));
        assert_eq!(entry.impact, MemoryImpact::Positive);
    }

    #[test]
    fn test_turn_budget_blocks_trigger() {
        let roster = test_roster();
        let mut engine = StorylineEngine::new(always_trigger());
        let mut rng = StdRng::seed_from_u64(1);

        let low_actions = TurnContext::new(RosterFixture::SOCIAL, GamePhase::Social, 1, 3).with_actions_remaining(1);
        assert_eq!(engine.take_turn(&low_actions, &roster, &mut rng), TurnOutcome::Idle);

        engine.events_today = 4;
        let context = TurnContext::new(RosterFixture::SOCIAL, GamePhase::Social, 1, 3);
        assert_eq!(engine.take_turn(&context, &roster, &mut rng), TurnOutcome::Idle);
        assert_eq!(engine.queue_len(), 0);
    }

    #[test]
    fn test_turn_generates_at_most_one_event() {
        let roster = test_roster();
        let mut engine = StorylineEngine::new(always_trigger());
        let mut rng = StdRng::seed_from_u64(42);
        let context = TurnContext::new(RosterFixture::SOCIAL, GamePhase::Social, 1, 3);

        let outcome = engine.take_turn(&context, &roster, &mut rng);
        assert_ne!(outcome, TurnOutcome::Idle);
        assert_eq!(engine.queue_len(), 1);
        assert_eq!(engine.events_today(), 1);

        engine.begin_day(2);
        assert_eq!(engine.events_today(), 0);
        assert_eq!(engine.day(), 2);
    }

    #[test]
    fn test_turn_prioritises_active_stage() {
        let roster = test_roster();
        let mut config = always_trigger();
        config.advance_chance = 1.0;
        let mut engine = StorylineEngine::new(config);
        engine.enqueue(StoryEvent::new("filler", "Filler", "", EventType::Diary));
        engine.start_storyline(SHOWMANCE, RosterFixture::COMP_BEAST, &roster).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let context = TurnContext::new(RosterFixture::SOCIAL, GamePhase::Social, 1, 3);
        let outcome = engine.take_turn(&context, &roster, &mut rng);

        assert_eq!(
            outcome,
            TurnOutcome::AdvancedStoryline {
                storyline_id: SHOWMANCE.to_string(),
                event_id: "showmance-1".to_string(),
            }
        );
        assert_eq!(engine.present_next().unwrap().id, "showmance-1");
    }

    #[test]
    fn test_reset_clears_everything() {
        let roster = test_roster();
        let mut engine = StorylineEngine::default();
        engine.start_storyline(SHOWMANCE, RosterFixture::COMP_BEAST, &roster).unwrap();
        engine.present_next();
        engine.reset();

        assert!(engine.open_event().is_none());
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.active_storylines().count(), 0);
        assert!(engine.start_storyline(SHOWMANCE, RosterFixture::COMP_BEAST, &roster).is_ok());
    }
}
