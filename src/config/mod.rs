pub mod engine_config;

pub use engine_config::{
    ConfigError, EngineConfig, GeneratorWeights, InferenceConfig, MemoryConfig, PhaseProbabilities,
    StorylineConfig,
};
