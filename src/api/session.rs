use futures_util::future::join_all;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::types::{GamePhase, ParticipantId};
use crate::config::EngineConfig;
use crate::inference::{HttpInferenceClient, InferenceClient};
use crate::modules::catalog::{recommend, smart_sort, EventFilter, Mood, RecommendationContext, ScoredEvent};
use crate::modules::decision::{Decision, DecisionEngine, DecisionRequest};
use crate::modules::dialogue::{DialogueContext, DialogueEngine, Situation};
use crate::modules::memory::{MemoryEntry, MemoryStore};
use crate::modules::participant::{Participant, Roster};
use crate::modules::storyline::{Resolution, StoryEvent, StorylineEngine, StorylineError, TurnContext, TurnOutcome};
use crate::persistence::ProfileStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    pub profiles_loaded: usize,
    pub memories_loaded: usize,
}

/// Owns the cast, the memory ledger and the engines for one game.
pub struct GameSession {
    config: EngineConfig,
    roster: Roster,
    memory: MemoryStore,
    storylines: StorylineEngine,
    decisions: DecisionEngine,
    dialogue: DialogueEngine,
    store: Option<Arc<dyn ProfileStore>>,
}

impl GameSession {
    pub fn new(config: EngineConfig, roster: Roster) -> Self {
        Self {
            memory: MemoryStore::with_config(config.memory.clone()),
            storylines: StorylineEngine::new(config.storyline.clone()),
            decisions: DecisionEngine::new(&config),
            dialogue: DialogueEngine::new(&config),
            roster,
            config,
            store: None,
        }
    }

    /// Builds the HTTP inference client when enabled. A client that cannot be
    /// built leaves the session on rules only.
    pub fn from_config(config: EngineConfig, roster: Roster) -> Self {
        let client = if config.inference.enabled {
            match HttpInferenceClient::from_config(&config.inference) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Inference disabled, using rule-based engines");
                    None
                }
            }
        } else {
            None
        };

        let session = Self::new(config, roster);
        match client {
            Some(client) => session.with_inference(Arc::new(client)),
            None => session,
        }
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.decisions = DecisionEngine::new(&self.config).with_inference(client.clone());
        self.dialogue = DialogueEngine::new(&self.config).with_inference(client);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Read-through load. Store failures are logged and treated as empty.
    pub async fn initialize(&mut self) -> InitReport {
        let Some(store) = self.store.clone() else {
            return InitReport::default();
        };

        let mut report = InitReport::default();
        match store.get_all_profiles().await {
            Ok(profiles) => {
                report.profiles_loaded = profiles.len();
                for profile in profiles {
                    self.roster.upsert(profile);
                }
            }
            Err(e) => warn!(error = %e, "Failed to load profiles, keeping current roster"),
        }

        let ids: Vec<ParticipantId> = self.roster.iter().map(|p| p.id.clone()).collect();
        let loads = ids.iter().map(|id| store.get_player_memory(id));
        let results = join_all(loads).await;

        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(entries) if entries.is_empty() => {}
                Ok(entries) => match self.memory.import(id, entries) {
                    Ok(()) => report.memories_loaded += 1,
                    Err(e) => warn!(participant_id = %id, error = %e, "Discarding invalid stored memory"),
                },
                Err(e) => warn!(participant_id = %id, error = %e, "Failed to load memory"),
            }
        }

        info!(
            profiles = report.profiles_loaded,
            memories = report.memories_loaded,
            "Session initialized"
        );
        report
    }

    async fn persist(&self, participant_id: &str, entry: &MemoryEntry) {
        if let Some(store) = &self.store {
            if let Err(e) = store.add_memory_entry(participant_id, entry).await {
                warn!(participant_id, error = %e, "Failed to persist memory entry");
            }
        }
    }

    /// Write-through insert; persistence is best effort.
    pub async fn record_memory(&mut self, participant_id: &str, entry: MemoryEntry) -> MemoryEntry {
        let stored = self.memory.add_entry(participant_id, entry);
        self.persist(participant_id, &stored).await;
        stored
    }

    pub async fn decide(&mut self, request: DecisionRequest) -> Decision {
        let participant_id = request.participant_id.clone();
        let decision = self.decisions.decide(&mut self.memory, &self.roster, request).await;
        if let Some(entry) = &decision.memory {
            self.persist(&participant_id, entry).await;
        }
        decision
    }

    pub async fn speak(&self, participant_id: &str, situation: Situation, context: &DialogueContext) -> String {
        self.dialogue
            .speak(&self.memory, &self.roster, participant_id, situation, context)
            .await
    }

    pub fn start_storyline(&mut self, storyline_id: &str, target_id: &str) -> Result<String, StorylineError> {
        self.storylines.start_storyline(storyline_id, target_id, &self.roster)
    }

    pub fn take_story_turn<R: Rng + ?Sized>(&mut self, context: &TurnContext, rng: &mut R) -> TurnOutcome {
        self.storylines.take_turn(context, &self.roster, rng)
    }

    pub fn begin_day(&mut self, day: u32) {
        self.storylines.begin_day(day);
    }

    pub fn present_next_event(&mut self) -> Option<&StoryEvent> {
        self.storylines.present_next()
    }

    pub async fn resolve_event(
        &mut self,
        event_id: &str,
        choice_id: &str,
        actor_id: &str,
        week: u32,
    ) -> Result<Resolution, StorylineError> {
        let resolution = self
            .storylines
            .resolve_choice(&mut self.memory, event_id, choice_id, actor_id, week)?;
        if let Some((participant_id, entry)) = &resolution.memory {
            self.persist(participant_id, entry).await;
        }
        Ok(resolution)
    }

    /// Queued, unresolved events in smart order for the current phase.
    pub fn upcoming_events(&self, phase: GamePhase) -> Vec<&StoryEvent> {
        let active: HashSet<String> = self
            .storylines
            .active_storylines()
            .map(|s| s.storyline_id.clone())
            .collect();
        let mut events = EventFilter::new()
            .excluding_completed()
            .apply(self.storylines.queued_events());
        smart_sort(&mut events, phase, &active);
        events
    }

    pub fn recommended_events(&self, player_id: &str, phase: GamePhase, mood: Mood) -> Vec<ScoredEvent<'_>> {
        let Some(player) = self.roster.get(player_id) else {
            return Vec::new();
        };
        let context = RecommendationContext::new(player, phase).with_mood(mood);
        recommend(
            EventFilter::new()
                .excluding_completed()
                .apply(self.storylines.queued_events()),
            &context,
        )
    }

    /// Status is owned by the caller; this replaces the stored copy.
    pub fn update_participant(&mut self, participant: Participant) {
        self.roster.upsert(participant);
    }

    pub fn reset(&mut self) {
        self.memory.clear_all();
        self.storylines.reset();
        info!("Session reset");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn storylines(&self) -> &StorylineEngine {
        &self.storylines
    }
}
