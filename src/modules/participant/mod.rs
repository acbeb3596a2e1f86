pub mod profile;
pub mod relationship;
pub mod roster;

pub use profile::{Archetype, Attributes, Participant, ParticipantStatus, Personality};
pub use relationship::{Relationship, RelationshipType};
pub use roster::Roster;
