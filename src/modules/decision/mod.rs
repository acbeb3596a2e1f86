pub mod engine;
pub mod rules;

pub use engine::{Decision, DecisionEngine, DecisionRequest, DecisionSource};
pub use rules::{decide_locally, grudge_target, DecisionType, LocalDecision};
