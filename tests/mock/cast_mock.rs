use houseguest_cognition::modules::participant::{Attributes, ParticipantStatus, Personality};
use houseguest_cognition::{Archetype, Participant, Relationship, RelationshipType, Roster};

/// (physical, strategic, loyalty, social)
pub fn houseguest(id: &str, name: &str, archetype: Archetype, stats: (u8, u8, u8, u8)) -> Participant {
    let (physical, strategic, loyalty, social) = stats;
    Participant::new(id, name)
        .with_attributes(Attributes {
            physical,
            strategic,
            loyalty,
            social,
            ..Attributes::default()
        })
        .with_personality(Personality::new(archetype, format!("{} the {}", name, archetype)))
}

pub struct TestCast;

impl TestCast {
    pub const PLANNER: &'static str = "planner";
    pub const CHARMER: &'static str = "charmer";
    pub const BRUISER: &'static str = "bruiser";
    pub const DRIFTER: &'static str = "drifter";
    pub const SCHEMER: &'static str = "schemer";
    pub const PLAYER: &'static str = "player";

    pub fn planner() -> Participant {
        houseguest(Self::PLANNER, "Quinn", Archetype::Mastermind, (2, 5, 2, 1))
            .with_relationship(Relationship::new(Self::DRIFTER, RelationshipType::Friend))
    }

    pub fn charmer() -> Participant {
        houseguest(Self::CHARMER, "Riley", Archetype::SocialButterfly, (2, 2, 4, 5))
            .with_relationship(Relationship::new(Self::BRUISER, RelationshipType::Ally))
            .with_relationship(Relationship::new(Self::SCHEMER, RelationshipType::Enemy))
    }

    /// Threat level 10: four HoH wins on modest stats.
    pub fn bruiser() -> Participant {
        houseguest(Self::BRUISER, "Jordan", Archetype::CompBeast, (1, 2, 3, 2)).with_status(ParticipantStatus {
            hoh_wins: 4,
            ..Default::default()
        })
    }

    /// Threat level 2.
    pub fn drifter() -> Participant {
        houseguest(Self::DRIFTER, "Casey", Archetype::Floater, (1, 2, 3, 2))
    }

    pub fn schemer() -> Participant {
        houseguest(Self::SCHEMER, "Rowan", Archetype::Villain, (3, 4, 1, 2))
            .with_relationship(Relationship::new(Self::CHARMER, RelationshipType::Rival))
    }

    pub fn player() -> Participant {
        Participant::new(Self::PLAYER, "Sam").with_status(ParticipantStatus {
            is_player_controlled: true,
            ..Default::default()
        })
    }

    pub fn roster() -> Roster {
        Roster::new(vec![
            Self::planner(),
            Self::charmer(),
            Self::bruiser(),
            Self::drifter(),
            Self::schemer(),
            Self::player(),
        ])
    }
}
