use serde::{Deserialize, Serialize};
use std::fmt;

pub type ParticipantId = String;

/// Week phases driven by the external phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Hoh,
    Nomination,
    Pov,
    PovMeeting,
    Eviction,
    Social,
}

impl GamePhase {
    pub const ALL: [GamePhase; 6] = [
        GamePhase::Hoh,
        GamePhase::Nomination,
        GamePhase::Pov,
        GamePhase::PovMeeting,
        GamePhase::Eviction,
        GamePhase::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Hoh => "hoh",
            GamePhase::Nomination => "nomination",
            GamePhase::Pov => "pov",
            GamePhase::PovMeeting => "pov_meeting",
            GamePhase::Eviction => "eviction",
            GamePhase::Social => "social",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
