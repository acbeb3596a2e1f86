pub mod services;
pub mod session;
pub mod types;

pub use session::{GameSession, InitReport};
pub use types::{GamePhase, ParticipantId};
