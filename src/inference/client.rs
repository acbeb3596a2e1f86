use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::api::types::{GamePhase, ParticipantId};
use crate::modules::participant::{Archetype, Attributes, Participant};

#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    #[error("Inference service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: ParticipantId,
    pub name: String,
    pub archetype: Archetype,
    pub traits: Vec<String>,
    pub background: String,
    pub attributes: Attributes,
}

impl From<&Participant> for ProfileSummary {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            archetype: participant.personality.archetype,
            traits: participant.personality.traits.clone(),
            background: participant.personality.background.clone(),
            attributes: participant.attributes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionGameContext {
    pub decision_type: String,
    pub options: Vec<String>,
    pub week: u32,
    pub phase: GamePhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPrompt {
    pub participant_profile: ProfileSummary,
    pub game_context: DecisionGameContext,
    pub recent_memory_summary: String,
    pub response_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReply {
    pub selected_option: Option<String>,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialoguePrompt {
    pub player_profile: ProfileSummary,
    pub game_phase: GamePhase,
    pub situation: String,
    pub recent_memory: Vec<String>,
    pub context: String,
    pub prompt: String,
    pub response_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueReply {
    #[serde(alias = "generatedText", alias = "text")]
    pub generated_text: String,
}

/// Remote model used as an optional upgrade over the rule-based engines.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn decide(&self, prompt: &DecisionPrompt) -> Result<DecisionReply, InferenceError>;

    async fn speak(&self, prompt: &DialoguePrompt) -> Result<DialogueReply, InferenceError>;
}

/// Bounds a remote call; an elapsed timer becomes [`InferenceError::Timeout`].
pub async fn with_timeout<T, F>(duration: Duration, call: F) -> Result<T, InferenceError>
where
    F: Future<Output = Result<T, InferenceError>>,
{
    match tokio::time::timeout(duration, call).await {
        Ok(result) => result,
        Err(_) => Err(InferenceError::Timeout(duration)),
    }
}
