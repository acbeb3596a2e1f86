//! Single-shot event generators: targeted, social and twist.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::api::types::{GamePhase, ParticipantId};
use crate::config::GeneratorWeights;
use crate::modules::participant::{Participant, RelationshipType, Roster};
use crate::modules::storyline::event::{EventOption, EventType, StoryEvent};

/// What the caller knows about the current turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub player_id: ParticipantId,
    pub phase: GamePhase,
    pub week: u32,
    pub day_count: u32,
    pub actions_remaining: u32,
}

impl TurnContext {
    pub fn new(player_id: impl Into<ParticipantId>, phase: GamePhase, week: u32, day_count: u32) -> Self {
        Self {
            player_id: player_id.into(),
            phase,
            week,
            day_count,
            actions_remaining: u32::MAX,
        }
    }

    pub fn with_actions_remaining(mut self, actions_remaining: u32) -> Self {
        self.actions_remaining = actions_remaining;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Targeted,
    Social,
    Twist,
}

fn fresh_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

fn on_the_block(player: &Participant) -> StoryEvent {
    StoryEvent::new(
        fresh_id("targeted-block"),
        "On The Block",
        format!("{}, you're sitting on the block. How do you spend the days before the veto?", player.name),
        EventType::Diary,
    )
    .with_option(
        EventOption::new("campaign", "Campaign hard")
            .with_consequence("You talk to everyone who will listen")
            .with_effect(1, 5.0),
    )
    .with_option(
        EventOption::new("lay_low", "Lay low and hope")
            .with_consequence("You keep your head down")
            .with_effect(0, 3.0),
    )
    .with_frequency(GamePhase::Nomination, 0.6)
    .with_frequency(GamePhase::Pov, 0.5)
    .with_frequency(GamePhase::PovMeeting, 0.4)
    .with_frequency(GamePhase::Eviction, 0.7)
}

fn hoh_room_visit(player: &Participant, visitor: &Participant) -> StoryEvent {
    StoryEvent::new(
        fresh_id("targeted-hoh"),
        "HoH Room Visitor",
        format!("{} knocks on the HoH room door wanting to talk about nominations.", visitor.name),
        EventType::Alliance,
    )
    .targeting(visitor.id.clone())
    .with_option(
        EventOption::new("reassure", format!("Reassure {}", visitor.name))
            .with_consequence(format!("{} leaves feeling safe", visitor.name))
            .with_effect(2, 4.0),
    )
    .with_option(
        EventOption::new("stay_vague", "Stay vague")
            .with_consequence(format!("{} leaves nervous", visitor.name))
            .with_effect(-1, 3.0),
    )
    .with_frequency(GamePhase::Hoh, 0.6)
    .with_frequency(GamePhase::Nomination, 0.5)
    .with_frequency(GamePhase::Social, if player.status.is_hoh { 0.3 } else { 0.0 })
}

fn veto_pressure(visitor: &Participant) -> StoryEvent {
    StoryEvent::new(
        fresh_id("targeted-veto"),
        "Veto Pressure",
        format!("{} begs you to use the veto on them.", visitor.name),
        EventType::Alliance,
    )
    .targeting(visitor.id.clone())
    .with_option(
        EventOption::new("promise", "Promise to consider it")
            .with_consequence(format!("{} is hopeful", visitor.name))
            .with_effect(1, 4.0),
    )
    .with_option(
        EventOption::new("refuse", "Tell them no")
            .with_consequence(format!("{} storms off", visitor.name))
            .with_effect(-2, 5.0),
    )
    .with_frequency(GamePhase::Pov, 0.4)
    .with_frequency(GamePhase::PovMeeting, 0.7)
}

fn alliance_check_in(alliance: &str) -> StoryEvent {
    StoryEvent::new(
        fresh_id("targeted-alliance"),
        "Alliance Meeting",
        format!("The {} alliance gathers in the storage room to count votes.", alliance),
        EventType::Alliance,
    )
    .with_option(
        EventOption::new("lead", "Take charge of the plan")
            .with_consequence("The alliance follows your lead")
            .with_effect(1, 4.0),
    )
    .with_option(
        EventOption::new("listen", "Let the others talk")
            .with_consequence("You learn who wants what")
            .with_effect(0, 2.0),
    )
    .in_every_phase(0.3)
    .with_frequency(GamePhase::Eviction, 0.5)
}

/// Builds the events the player's status qualifies for, keeps those that pass
/// their per-phase roll and picks one of the survivors.
pub fn generate_targeted<R: Rng + ?Sized>(context: &TurnContext, roster: &Roster, rng: &mut R) -> Option<StoryEvent> {
    let player = roster.get(&context.player_id)?;
    let others = roster.others(&player.id);
    let mut candidates = Vec::new();

    if player.status.is_nominated {
        candidates.push(on_the_block(player));
    }
    if player.status.is_hoh {
        if let Some(visitor) = others.choose(rng) {
            candidates.push(hoh_room_visit(player, visitor));
        }
    }
    if player.status.has_pov {
        if let Some(nominee) = others.iter().find(|p| p.status.is_nominated) {
            candidates.push(veto_pressure(nominee));
        }
    }
    if let Some(alliance) = player.status.alliances.choose(rng) {
        candidates.push(alliance_check_in(alliance));
    }

    let passed: Vec<StoryEvent> = candidates
        .into_iter()
        .filter(|event| rng.gen::<f32>() < event.phase_probability(context.phase))
        .collect();

    passed.choose(rng).cloned()
}

/// Picks a random houseguest and branches on how the player feels about them.
pub fn generate_social<R: Rng + ?Sized>(context: &TurnContext, roster: &Roster, rng: &mut R) -> Option<StoryEvent> {
    let player = roster.get(&context.player_id)?;
    let other = *roster.others(&player.id).choose(rng)?;
    let relationship = player.relationship_type_with(&other.id);
    let name = &other.name;

    let event = match relationship {
        RelationshipType::Ally | RelationshipType::Friend => StoryEvent::new(
            fresh_id("social-bond"),
            "Heart To Heart",
            format!("{} wants to talk about the two of you going far together.", name),
            EventType::Social,
        )
        .with_option(
            EventOption::new("commit", "Promise to look out for each other")
                .with_consequence(format!("{} trusts you more", name))
                .with_effect(2, 4.0),
        )
        .with_option(
            EventOption::new("hedge", "Keep your options open")
                .with_consequence(format!("{} senses some distance", name))
                .with_effect(-1, 3.0),
        ),
        RelationshipType::Enemy | RelationshipType::Rival => StoryEvent::new(
            fresh_id("social-clash"),
            "Kitchen Clash",
            format!("{} picks a fight with you over the dishes.", name),
            EventType::Social,
        )
        .with_option(
            EventOption::new("apologize", "Apologize")
                .with_consequence(format!("Things cool down with {}", name))
                .with_effect(1, 3.0),
        )
        .with_option(
            EventOption::new("fight_back", "Fight back")
                .with_consequence(format!("The whole house heard you and {} scream", name))
                .with_effect(-2, 6.0),
        ),
        RelationshipType::Neutral => StoryEvent::new(
            fresh_id("social-meet"),
            "Getting To Know You",
            format!("You end up alone with {} in the backyard.", name),
            EventType::Social,
        )
        .with_option(
            EventOption::new("open_up", "Share something personal")
                .with_consequence(format!("You and {} connect", name))
                .with_effect(1, 3.0),
        )
        .with_option(
            EventOption::new("small_talk", "Keep it light")
                .with_consequence("A pleasant if forgettable chat")
                .with_effect(0, 1.0),
        ),
    };

    Some(
        event
            .requiring_relationship(other.id.clone(), relationship)
            .in_every_phase(0.5),
    )
}

lazy_static! {
    static ref TWISTS: Vec<StoryEvent> = vec![
        StoryEvent::new("twist-double-eviction", "Double Eviction", "Tonight two houseguests will leave the house.", EventType::Twist)
            .with_option(EventOption::new("scramble", "Scramble for votes").with_effect(0, 6.0))
            .with_option(EventOption::new("trust", "Trust your alliance").with_effect(1, 4.0))
            .with_frequency(GamePhase::Eviction, 0.6)
            .with_frequency(GamePhase::PovMeeting, 0.2),
        StoryEvent::new("twist-have-not", "Have-Nots", "You are a have-not this week: slop and cold showers.", EventType::Twist)
            .with_option(EventOption::new("embrace", "Embrace the slop").with_effect(0, 2.0))
            .with_option(EventOption::new("complain", "Complain to anyone nearby").with_effect(-1, 2.0))
            .with_frequency(GamePhase::Hoh, 0.5)
            .with_frequency(GamePhase::Social, 0.4),
        StoryEvent::new("twist-secret-power", "Secret Power", "America has voted to give you a secret power.", EventType::Twist)
            .with_option(EventOption::new("use", "Use it this week").with_effect(0, 7.0))
            .with_option(EventOption::new("save", "Save it for later").with_effect(0, 5.0))
            .with_frequency(GamePhase::Nomination, 0.3)
            .with_frequency(GamePhase::Pov, 0.3)
            .with_frequency(GamePhase::Social, 0.2),
        StoryEvent::new("twist-battle-back", "Battle Back", "An evicted houseguest is fighting to return.", EventType::Competition)
            .with_option(EventOption::new("root_for", "Root for their return").with_effect(1, 3.0))
            .with_option(EventOption::new("root_against", "Hope they stay gone").with_effect(-1, 3.0))
            .with_frequency(GamePhase::Eviction, 0.3)
            .with_frequency(GamePhase::Hoh, 0.2),
    ];
}

/// Phase-weighted pick from the fixed twist catalog.
pub fn generate_twist<R: Rng + ?Sized>(context: &TurnContext, rng: &mut R) -> Option<StoryEvent> {
    let eligible: Vec<&StoryEvent> = TWISTS.iter().filter(|t| t.occurs_in(context.phase)).collect();
    let twist = eligible
        .choose_weighted(rng, |t| t.phase_probability(context.phase))
        .ok()?;

    let mut event = (*twist).clone();
    event.id = fresh_id(&event.id);
    Some(event)
}

pub fn twist_catalog() -> &'static [StoryEvent] {
    &TWISTS
}

/// Chooses a generator by weight. A generator with nothing to offer hands over
/// to the others in fixed order.
pub fn generate_generic<R: Rng + ?Sized>(
    context: &TurnContext,
    roster: &Roster,
    weights: &GeneratorWeights,
    rng: &mut R,
) -> Option<StoryEvent> {
    let kinds = [
        (GeneratorKind::Targeted, weights.targeted),
        (GeneratorKind::Social, weights.social),
        (GeneratorKind::Twist, weights.twist),
    ];

    let first = kinds
        .choose_weighted(rng, |(_, weight)| weight.max(0.0))
        .map(|(kind, _)| *kind)
        .unwrap_or(GeneratorKind::Social);

    let order = std::iter::once(first).chain(kinds.iter().map(|(kind, _)| *kind).filter(move |k| *k != first));
    for kind in order {
        let event = match kind {
            GeneratorKind::Targeted => generate_targeted(context, roster, rng),
            GeneratorKind::Social => generate_social(context, roster, rng),
            GeneratorKind::Twist => generate_twist(context, rng),
        };
        if event.is_some() {
            return event;
        }
    }
    None
}
