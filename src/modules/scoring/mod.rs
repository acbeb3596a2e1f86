pub mod heuristics;

pub use heuristics::{
    compatibility, rank_by_compatibility, rank_by_relationship_ascending, rank_by_threat, relationship_score,
    relationship_strength, threat_level,
};
