pub mod decay;
pub mod store;

pub use decay::{effective_importance, retention_weight};
pub use store::{memory_types, MemoryEntry, MemoryImpact, MemoryStore, TriggerContext};
