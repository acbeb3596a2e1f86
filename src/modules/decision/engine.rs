use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::types::{GamePhase, ParticipantId};
use crate::config::EngineConfig;
use crate::inference::{
    with_timeout, DecisionGameContext, DecisionPrompt, InferenceClient, InferenceError, ProfileSummary,
};
use crate::modules::decision::rules::{decide_locally, DecisionType, LocalDecision};
use crate::modules::memory::{MemoryEntry, MemoryStore};
use crate::modules::participant::{Participant, Roster};

#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub participant_id: ParticipantId,
    pub decision_type: DecisionType,
    pub candidate_ids: Vec<ParticipantId>,
    pub week: u32,
    pub phase: GamePhase,
    /// Memory handed in by the caller; the store is consulted when empty.
    pub recent_memory: Vec<MemoryEntry>,
}

impl DecisionRequest {
    pub fn new(
        participant_id: impl Into<ParticipantId>,
        decision_type: DecisionType,
        candidate_ids: Vec<ParticipantId>,
        week: u32,
        phase: GamePhase,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            decision_type,
            candidate_ids,
            week,
            phase,
            recent_memory: Vec::new(),
        }
    }

    pub fn with_recent_memory(mut self, recent_memory: Vec<MemoryEntry>) -> Self {
        self.recent_memory = recent_memory;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Rules,
    Inference,
}

#[derive(Debug, Clone)]
pub struct Decision {
    pub choice: Option<ParticipantId>,
    pub reasoning: String,
    pub source: DecisionSource,
    /// The entry written for this decision, for write-through persistence.
    pub memory: Option<MemoryEntry>,
}

pub struct DecisionEngine {
    inference: Option<Arc<dyn InferenceClient>>,
    timeout: Duration,
}

impl DecisionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            inference: None,
            timeout: config.inference.timeout(),
        }
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn has_inference(&self) -> bool {
        self.inference.is_some()
    }

    /// Never fails: remote problems degrade to the rule-based choice.
    pub async fn decide(&self, memory: &mut MemoryStore, roster: &Roster, request: DecisionRequest) -> Decision {
        let Some(actor) = roster.get(&request.participant_id) else {
            warn!(participant_id = %request.participant_id, "Decision requested for unknown participant");
            return Decision {
                choice: None,
                reasoning: format!("Unknown participant {}", request.participant_id),
                source: DecisionSource::Rules,
                memory: None,
            };
        };

        let recent_memory = if request.recent_memory.is_empty() {
            memory.get_memory(&actor.id)
        } else {
            request.recent_memory.clone()
        };

        let local = decide_locally(
            actor,
            roster,
            request.decision_type,
            &request.candidate_ids,
            &recent_memory,
        );

        let (chosen, source) = match self.ask_remote(actor, roster, &request, &recent_memory).await {
            Some(remote) => (remote, DecisionSource::Inference),
            None => (local, DecisionSource::Rules),
        };

        let entry = Self::decision_memory(memory, roster, &request, &chosen);
        let stored = memory.add_entry(&actor.id, entry);

        debug!(
            participant_id = %actor.id,
            decision_type = %request.decision_type,
            choice = ?chosen.choice,
            source = ?source,
            "Decision made"
        );

        Decision {
            choice: chosen.choice,
            reasoning: chosen.reasoning,
            source,
            memory: Some(stored),
        }
    }

    async fn ask_remote(
        &self,
        actor: &Participant,
        roster: &Roster,
        request: &DecisionRequest,
        recent_memory: &[MemoryEntry],
    ) -> Option<LocalDecision> {
        let client = self.inference.as_ref()?;
        if request.candidate_ids.is_empty() {
            return None;
        }

        let prompt = Self::build_prompt(actor, roster, request, recent_memory);
        let result = with_timeout(self.timeout, client.decide(&prompt))
            .await
            .and_then(|reply| {
                let selected = reply
                    .selected_option
                    .ok_or_else(|| InferenceError::Malformed("selectedOption is null".to_string()))?;
                let choice = Self::match_option(roster, &request.candidate_ids, &selected).ok_or_else(|| {
                    InferenceError::Malformed(format!("selectedOption '{}' is not a known option", selected))
                })?;
                Ok(LocalDecision {
                    choice: Some(choice),
                    reasoning: reply.reasoning,
                })
            });

        match result {
            Ok(decision) => Some(decision),
            Err(e) => {
                warn!(participant_id = %actor.id, error = %e, "Remote decision failed, using rules");
                None
            }
        }
    }

    fn build_prompt(
        actor: &Participant,
        roster: &Roster,
        request: &DecisionRequest,
        recent_memory: &[MemoryEntry],
    ) -> DecisionPrompt {
        let options = request
            .candidate_ids
            .iter()
            .map(|id| roster.get(id).map(|p| p.name.clone()).unwrap_or_else(|| id.clone()))
            .collect();

        let recent_memory_summary = recent_memory
            .iter()
            .take(5)
            .map(|m| m.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        DecisionPrompt {
            participant_profile: ProfileSummary::from(actor),
            game_context: DecisionGameContext {
                decision_type: request.decision_type.as_str().to_string(),
                options,
                week: request.week,
                phase: request.phase,
            },
            recent_memory_summary,
            response_type: "decision".to_string(),
        }
    }

    /// Matches an option by display name (case-insensitive) or by id.
    fn match_option(roster: &Roster, candidate_ids: &[ParticipantId], selected: &str) -> Option<ParticipantId> {
        let selected = selected.trim();
        candidate_ids
            .iter()
            .find(|id| {
                id.as_str() == selected
                    || roster
                        .get(id)
                        .map(|p| p.name.eq_ignore_ascii_case(selected))
                        .unwrap_or(false)
            })
            .cloned()
    }

    fn decision_memory(
        memory: &MemoryStore,
        roster: &Roster,
        request: &DecisionRequest,
        decision: &LocalDecision,
    ) -> MemoryEntry {
        let config = memory.config();
        let target = decision
            .choice
            .as_deref()
            .map(|id| roster.get(id).map(|p| p.name.as_str()).unwrap_or(id))
            .unwrap_or("no one");

        let description = format!("Decided to {} {}: {}", request.decision_type.verb(), target, decision.reasoning);
        let entry = MemoryEntry::new(
            request.decision_type.memory_type(),
            request.week,
            description,
            config.decision_importance,
        )
        .with_impact(request.decision_type.impact())
        .with_decay_factor(config.decision_decay_factor);

        match &decision.choice {
            Some(choice) => entry.with_related(choice.clone()),
            None => entry,
        }
    }
}
