use crate::modules::memory::{memory_types, MemoryEntry, MemoryImpact};
use crate::modules::participant::{
    Archetype, Attributes, Participant, ParticipantStatus, Personality, Relationship, RelationshipType, Roster,
};

pub struct RosterFixture;

impl RosterFixture {
    pub const MASTERMIND: &'static str = "hg-1";
    pub const SOCIAL: &'static str = "hg-2";
    pub const VILLAIN: &'static str = "hg-3";
    pub const COMP_BEAST: &'static str = "hg-4";
    pub const FLOATER: &'static str = "hg-5";
    pub const PLAYER: &'static str = "hg-player";
}

fn attributes(physical: u8, strategic: u8, loyalty: u8, social: u8) -> Attributes {
    Attributes {
        physical,
        strategic,
        loyalty,
        social,
        ..Attributes::default()
    }
}

pub fn mastermind() -> Participant {
    Participant::new(RosterFixture::MASTERMIND, "Morgan")
        .with_attributes(attributes(2, 5, 2, 1))
        .with_personality(
            Personality::new(Archetype::Mastermind, "Chess coach who plans three weeks ahead")
                .with_traits(["calculating", "patient"]),
        )
        .with_relationship(Relationship::new(RosterFixture::FLOATER, RelationshipType::Friend))
}

pub fn social_butterfly() -> Participant {
    Participant::new(RosterFixture::SOCIAL, "Sunny")
        .with_attributes(attributes(2, 2, 4, 5))
        .with_personality(
            Personality::new(Archetype::SocialButterfly, "Bartender who knows everyone's name")
                .with_traits(["warm", "chatty"]),
        )
        .with_relationship(Relationship::new(RosterFixture::COMP_BEAST, RelationshipType::Friend))
        .with_relationship(Relationship::new(RosterFixture::VILLAIN, RelationshipType::Enemy))
}

pub fn villain() -> Participant {
    Participant::new(RosterFixture::VILLAIN, "Vex")
        .with_attributes(attributes(3, 4, 1, 2))
        .with_personality(
            Personality::new(Archetype::Villain, "Reality TV veteran who loves the drama")
                .with_traits(["ruthless", "loud"]),
        )
        .with_relationship(Relationship::new(RosterFixture::SOCIAL, RelationshipType::Rival))
}

pub fn comp_beast() -> Participant {
    Participant::new(RosterFixture::COMP_BEAST, "Blaze")
        .with_attributes(attributes(5, 2, 4, 3))
        .with_personality(
            Personality::new(Archetype::CompBeast, "Former college sprinter").with_traits(["competitive"]),
        )
        .with_status(ParticipantStatus {
            hoh_wins: 2,
            pov_wins: 1,
            ..Default::default()
        })
}

pub fn floater() -> Participant {
    Participant::new(RosterFixture::FLOATER, "Fern")
        .with_attributes(attributes(2, 2, 3, 3))
        .with_personality(Personality::new(Archetype::Floater, "Yoga instructor").with_traits(["easygoing"]))
}

pub fn player() -> Participant {
    Participant::new(RosterFixture::PLAYER, "Pat").with_status(ParticipantStatus {
        is_player_controlled: true,
        ..Default::default()
    })
}

pub fn test_roster() -> Roster {
    Roster::new(vec![mastermind(), social_butterfly(), villain(), comp_beast(), floater(), player()])
}

pub fn memory_fixtures() -> Vec<MemoryEntry> {
    vec![
        MemoryEntry::new(memory_types::CONVERSATION, 1, "Sunny covered for me at dinner", 2.0)
            .with_related(RosterFixture::SOCIAL)
            .with_impact(MemoryImpact::Positive),
        MemoryEntry::new(memory_types::BETRAYAL, 2, "Vex told the house about our deal", 5.0)
            .with_related(RosterFixture::VILLAIN)
            .with_impact(MemoryImpact::Negative),
        MemoryEntry::new(memory_types::HOH_WIN, 2, "Won the endurance HoH", 4.0).with_impact(MemoryImpact::Positive),
        MemoryEntry::new(memory_types::NOMINATION, 3, "Sunny nominated me as a pawn", 3.0)
            .with_related(RosterFixture::SOCIAL)
            .with_impact(MemoryImpact::Negative),
    ]
}
