use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::types::{GamePhase, ParticipantId};
use crate::config::EngineConfig;
use crate::inference::{with_timeout, DialoguePrompt, InferenceClient, InferenceError, ProfileSummary};
use crate::modules::dialogue::templates::{fill_template, render_local, templates_for, Situation};
use crate::modules::memory::MemoryStore;
use crate::modules::participant::{Participant, Roster};

pub const UNKNOWN_SPEAKER_LINE: &str = "...";

const MIN_PROMPT_MEMORIES: usize = 3;
const MAX_PROMPT_MEMORIES: usize = 5;

#[derive(Debug, Clone)]
pub struct DialogueContext {
    pub phase: GamePhase,
    pub target_id: Option<ParticipantId>,
    /// Free text describing what just happened.
    pub detail: String,
}

impl DialogueContext {
    pub fn new(phase: GamePhase) -> Self {
        Self {
            phase,
            target_id: None,
            detail: String::new(),
        }
    }

    pub fn with_target(mut self, target_id: impl Into<ParticipantId>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

pub struct DialogueEngine {
    inference: Option<Arc<dyn InferenceClient>>,
    timeout: Duration,
    memory_count: usize,
}

impl DialogueEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            inference: None,
            timeout: config.inference.timeout(),
            memory_count: config
                .memory
                .dialogue_memory_count
                .clamp(MIN_PROMPT_MEMORIES, MAX_PROMPT_MEMORIES),
        }
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub async fn speak(
        &self,
        memory: &MemoryStore,
        roster: &Roster,
        participant_id: &str,
        situation: Situation,
        context: &DialogueContext,
    ) -> String {
        let Some(speaker) = roster.get(participant_id) else {
            warn!(participant_id, "Dialogue requested for unknown participant");
            return UNKNOWN_SPEAKER_LINE.to_string();
        };

        let target = Self::target_name(roster, context);

        if let Some(client) = &self.inference {
            let prompt = self.build_prompt(memory, speaker, situation, context, &target);
            let result = with_timeout(self.timeout, client.speak(&prompt))
                .await
                .and_then(|reply| {
                    let text = reply.generated_text.trim().to_string();
                    if text.is_empty() {
                        return Err(InferenceError::Malformed("generated_text is empty".to_string()));
                    }
                    Ok(text)
                });

            match result {
                Ok(text) => {
                    debug!(participant_id, situation = %situation, "Remote dialogue generated");
                    return text;
                }
                Err(e) => warn!(participant_id, error = %e, "Remote dialogue failed, using templates"),
            }
        }

        Self::speak_locally(speaker, situation, &target)
    }

    pub fn speak_locally(speaker: &Participant, situation: Situation, target: &str) -> String {
        let mut rng = rand::thread_rng();
        render_local(speaker.personality.archetype, situation, &speaker.name, target, &mut rng)
    }

    fn target_name(roster: &Roster, context: &DialogueContext) -> String {
        match context.target_id.as_deref() {
            Some(id) => roster.get(id).map(|p| p.name.clone()).unwrap_or_else(|| id.to_string()),
            None => "everyone".to_string(),
        }
    }

    fn build_prompt(
        &self,
        memory: &MemoryStore,
        speaker: &Participant,
        situation: Situation,
        context: &DialogueContext,
        target: &str,
    ) -> DialoguePrompt {
        let personality = &speaker.personality;
        let recent_memory: Vec<String> = memory
            .get_recent(&speaker.id, self.memory_count)
            .into_iter()
            .map(|m| m.description)
            .collect();

        let example = templates_for(personality.archetype, situation)
            .first()
            .map(|t| fill_template(t, &speaker.name, target))
            .unwrap_or_default();

        let prompt = format!(
            "You are {}, a {} houseguest. Traits: {}. Background: {}.\n\
             Recent memories: {}.\n\
             Example line: \"{}\"\n\
             Say one short in-character line about the {} situation, addressed to {}.",
            speaker.name,
            personality.archetype,
            personality.traits.join(", "),
            personality.background,
            recent_memory.join("; "),
            example,
            situation,
            target,
        );

        DialoguePrompt {
            player_profile: ProfileSummary::from(speaker),
            game_phase: context.phase,
            situation: situation.as_str().to_string(),
            recent_memory,
            context: context.detail.clone(),
            prompt,
            response_type: "dialogue".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_test_mock::fixtures::{test_roster, RosterFixture};
    use crate::_test_mock::inference_mock::MockInferenceClient;
    use crate::modules::memory::MemoryEntry;
    use crate::modules::participant::Archetype;

    fn is_template_line(archetype: Archetype, situation: Situation, speaker: &str, target: &str, line: &str) -> bool {
        templates_for(archetype, situation)
            .iter()
            .any(|t| fill_template(t, speaker, target) == line)
    }

    #[tokio::test]
    async fn test_local_line_matches_archetype() {
        let engine = DialogueEngine::new(&EngineConfig::default());
        let roster = test_roster();
        let memory = MemoryStore::new();
        let context = DialogueContext::new(GamePhase::Eviction).with_target(RosterFixture::FLOATER);

        let line = engine
            .speak(&memory, &roster, RosterFixture::VILLAIN, Situation::Eviction, &context)
            .await;

        assert!(is_template_line(Archetype::Villain, Situation::Eviction, "Vex", "Fern", &line));
    }

    #[tokio::test]
    async fn test_unknown_speaker_gets_fallback_line() {
        let engine = DialogueEngine::new(&EngineConfig::default());
        let line = engine
            .speak(
                &MemoryStore::new(),
                &test_roster(),
                "ghost",
                Situation::General,
                &DialogueContext::new(GamePhase::Social),
            )
            .await;
        assert_eq!(line, UNKNOWN_SPEAKER_LINE);
    }

    #[tokio::test]
    async fn test_remote_prompt_carries_recent_memories() {
        let client = Arc::new(MockInferenceClient::new().with_dialogue("  Let's make a deal.  "));
        let engine = DialogueEngine::new(&EngineConfig::default()).with_inference(client.clone());
        let roster = test_roster();
        let mut memory = MemoryStore::new();
        for i in 0..7 {
            memory.add_entry_at(
                RosterFixture::MASTERMIND,
                MemoryEntry::new("conversation", 1, format!("talk {}", i), 2.0),
                1_000 + i,
            );
        }

        let line = engine
            .speak(
                &memory,
                &roster,
                RosterFixture::MASTERMIND,
                Situation::General,
                &DialogueContext::new(GamePhase::Social).with_detail("kitchen chat"),
            )
            .await;

        assert_eq!(line, "Let's make a deal.");
        let prompt = client.last_dialogue_prompt().unwrap();
        assert_eq!(prompt.recent_memory.len(), 5);
        assert_eq!(prompt.recent_memory[0], "talk 6");
        assert_eq!(prompt.context, "kitchen chat");
        assert!(prompt.prompt.contains("mastermind"));
    }

    #[tokio::test]
    async fn test_empty_remote_text_falls_back() {
        let client = Arc::new(MockInferenceClient::new().with_dialogue("   "));
        let engine = DialogueEngine::new(&EngineConfig::default()).with_inference(client);
        let roster = test_roster();

        let line = engine
            .speak(
                &MemoryStore::new(),
                &roster,
                RosterFixture::COMP_BEAST,
                Situation::Hoh,
                &DialogueContext::new(GamePhase::Hoh),
            )
            .await;

        assert!(is_template_line(Archetype::CompBeast, Situation::Hoh, "Blaze", "everyone", &line));
    }
}
