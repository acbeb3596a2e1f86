pub mod engine;
pub mod event;
pub mod generators;
pub mod stages;

pub use engine::{ActiveStoryline, Resolution, StorylineEngine, StorylineError, TurnOutcome, HISTORY_LIMIT};
pub use event::{EventOption, EventRequirement, EventType, PhaseFrequency, StoryEvent};
pub use generators::{generate_generic, generate_social, generate_targeted, generate_twist, TurnContext};
pub use stages::{StageContext, StorylineDefinition, STORYLINES};
