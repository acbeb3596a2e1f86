use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::api::types::GamePhase;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Probability = f32;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_entries_per_participant: usize,
    pub decision_importance: f32,
    pub decision_decay_factor: f32,
    pub triggered_limit: usize,
    pub dialogue_memory_count: usize,
}

impl MemoryConfig {
    pub fn new(max_entries_per_participant: usize) -> Self {
        Self {
            max_entries_per_participant,
            ..Self::default()
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_entries_per_participant: 30,
            decision_importance: 4.0,
            decision_decay_factor: 0.8,
            triggered_limit: 3,
            dialogue_memory_count: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key_env: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseProbabilities {
    pub hoh: Probability,
    pub nomination: Probability,
    pub pov: Probability,
    pub pov_meeting: Probability,
    pub eviction: Probability,
    pub social: Probability,
}

impl PhaseProbabilities {
    pub fn get(&self, phase: GamePhase) -> Probability {
        match phase {
            GamePhase::Hoh => self.hoh,
            GamePhase::Nomination => self.nomination,
            GamePhase::Pov => self.pov,
            GamePhase::PovMeeting => self.pov_meeting,
            GamePhase::Eviction => self.eviction,
            GamePhase::Social => self.social,
        }
    }
}

impl Default for PhaseProbabilities {
    fn default() -> Self {
        Self {
            hoh: 0.25,
            nomination: 0.35,
            pov: 0.25,
            pov_meeting: 0.3,
            eviction: 0.4,
            social: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorWeights {
    pub targeted: f32,
    pub social: f32,
    pub twist: f32,
}

impl Default for GeneratorWeights {
    fn default() -> Self {
        Self {
            targeted: 0.4,
            social: 0.4,
            twist: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorylineConfig {
    pub phase_probabilities: PhaseProbabilities,
    pub day_bonus_per_day: Probability,
    pub max_day_bonus: Probability,
    pub max_events_per_day: u32,
    pub min_actions_remaining: u32,
    pub advance_chance: Probability,
    pub start_chance: Probability,
    pub generator_weights: GeneratorWeights,
}

impl StorylineConfig {
    /// `base + min(max_day_bonus, day_count * day_bonus_per_day)`.
    pub fn trigger_probability(&self, phase: GamePhase, day_count: u32) -> Probability {
        let bonus = (day_count as f32 * self.day_bonus_per_day).min(self.max_day_bonus);
        (self.phase_probabilities.get(phase) + bonus).clamp(0.0, 1.0)
    }
}

impl Default for StorylineConfig {
    fn default() -> Self {
        Self {
            phase_probabilities: PhaseProbabilities::default(),
            day_bonus_per_day: 0.05,
            max_day_bonus: 0.3,
            max_events_per_day: 3,
            min_actions_remaining: 2,
            advance_chance: 0.5,
            start_chance: 0.15,
            generator_weights: GeneratorWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub memory: MemoryConfig,
    pub inference: InferenceConfig,
    pub storyline: StorylineConfig,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.max_entries_per_participant == 0 {
            return Err(ConfigError::Invalid(
                "memory.max_entries_per_participant must be greater than 0".to_string(),
            ));
        }

        if !(self.memory.decision_decay_factor > 0.0 && self.memory.decision_decay_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "memory.decision_decay_factor is {}, but must be in (0, 1]",
                self.memory.decision_decay_factor
            )));
        }

        if self.inference.enabled && self.inference.endpoint.is_none() {
            return Err(ConfigError::Invalid(
                "inference.endpoint is required when inference is enabled".to_string(),
            ));
        }

        let storyline = &self.storyline;
        let probabilities = GamePhase::ALL
            .iter()
            .map(|phase| (phase.as_str(), storyline.phase_probabilities.get(*phase)))
            .chain([
                ("advance_chance", storyline.advance_chance),
                ("start_chance", storyline.start_chance),
            ]);

        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "Probability '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
