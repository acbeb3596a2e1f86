pub mod api;
pub mod config;
pub mod inference;
pub mod modules;
pub mod persistence;

#[cfg(test)]
mod _test_mock;

pub use api::{GamePhase, GameSession, InitReport, ParticipantId};
pub use config::{ConfigError, EngineConfig};
pub use inference::{HttpInferenceClient, InferenceClient, InferenceError};
pub use modules::decision::{Decision, DecisionEngine, DecisionRequest, DecisionSource, DecisionType};
pub use modules::dialogue::{DialogueContext, DialogueEngine, Situation};
pub use modules::memory::{MemoryEntry, MemoryImpact, MemoryStore};
pub use modules::participant::{Archetype, Participant, ParticipantStatus, Relationship, RelationshipType, Roster};
pub use modules::storyline::{StoryEvent, StorylineEngine, StorylineError, TurnContext, TurnOutcome};
pub use persistence::{JsonFileStore, PersistenceError, ProfileStore};
