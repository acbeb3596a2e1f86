pub mod engine;
pub mod templates;

pub use engine::{DialogueContext, DialogueEngine, UNKNOWN_SPEAKER_LINE};
pub use templates::{render_local, templates_for, Situation};
