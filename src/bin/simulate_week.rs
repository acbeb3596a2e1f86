use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use houseguest_cognition::api::services::validation_service::load_roster_json;
use houseguest_cognition::modules::participant::{Attributes, Personality, ParticipantStatus};
use houseguest_cognition::{
    Archetype, DecisionRequest, DecisionType, DialogueContext, EngineConfig, GamePhase, GameSession,
    JsonFileStore, Participant, ParticipantId, Relationship, RelationshipType, Roster, Situation, TurnContext,
    TurnOutcome,
};

/// Runs one nomination, veto and eviction round plus a handful of story turns.
#[derive(Parser, Debug)]
#[command(name = "simulate-week")]
#[command(about = "Simulate a week of houseguest decisions, dialogue and storyline events")]
struct Args {
    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster as a JSON array of participant profiles
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Directory used for profile and memory persistence
    #[arg(long)]
    store: Option<PathBuf>,

    /// Random seed for story turns
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Number of story turns to run after the eviction
    #[arg(long, default_value_t = 9)]
    turns: u32,

    #[arg(long, default_value_t = 1)]
    week: u32,
}

fn houseguest(
    id: &str,
    name: &str,
    archetype: Archetype,
    (physical, strategic, loyalty, social): (u8, u8, u8, u8),
    background: &str,
) -> Participant {
    Participant::new(id, name)
        .with_attributes(Attributes {
            physical,
            strategic,
            loyalty,
            social,
            ..Attributes::default()
        })
        .with_personality(Personality::new(archetype, background))
}

fn demo_roster() -> Roster {
    Roster::new(vec![
        houseguest("hg-1", "Morgan", Archetype::Mastermind, (2, 5, 2, 2), "Chess coach")
            .with_relationship(Relationship::new("hg-5", RelationshipType::Ally)),
        houseguest("hg-2", "Sunny", Archetype::SocialButterfly, (2, 2, 4, 5), "Bartender")
            .with_relationship(Relationship::new("hg-4", RelationshipType::Friend))
            .with_relationship(Relationship::new("hg-3", RelationshipType::Enemy)),
        houseguest("hg-3", "Vex", Archetype::Villain, (3, 4, 1, 2), "Reality TV veteran")
            .with_relationship(Relationship::new("hg-2", RelationshipType::Rival)),
        houseguest("hg-4", "Blaze", Archetype::CompBeast, (5, 2, 4, 3), "College sprinter"),
        houseguest("hg-5", "Fern", Archetype::Floater, (2, 2, 3, 3), "Yoga instructor"),
        Participant::new("hg-player", "Pat").with_status(ParticipantStatus {
            is_player_controlled: true,
            ..Default::default()
        }),
    ])
}

fn name_of(session: &GameSession, id: &str) -> String {
    session
        .roster()
        .get(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

async fn say(session: &GameSession, speaker: &str, situation: Situation, context: DialogueContext) {
    let line = session.speak(speaker, situation, &context).await;
    println!("  {}: \"{}\"", name_of(session, speaker), line);
}

async fn run_ceremonies(session: &mut GameSession, week: u32) -> Option<ParticipantId> {
    let houseguests: Vec<ParticipantId> = session
        .roster()
        .active()
        .filter(|p| !p.status.is_player_controlled)
        .map(|p| p.id.clone())
        .collect();
    let (hoh, rest) = houseguests.split_first()?;
    let hoh = hoh.clone();

    println!("\n== Week {} | HoH: {} ==", week, name_of(session, &hoh));

    let mut nominees = Vec::new();
    for _ in 0..2 {
        let candidates: Vec<ParticipantId> = rest.iter().filter(|id| !nominees.contains(*id)).cloned().collect();
        let request = DecisionRequest::new(hoh.clone(), DecisionType::Nominate, candidates, week, GamePhase::Nomination);
        let decision = session.decide(request).await;
        if let Some(nominee) = decision.choice {
            println!("  Nominated {} ({})", name_of(session, &nominee), decision.reasoning);
            say(
                session,
                &hoh,
                Situation::Nomination,
                DialogueContext::new(GamePhase::Nomination).with_target(nominee.clone()),
            )
            .await;
            nominees.push(nominee);
        }
    }

    if let Some(holder) = rest.iter().find(|id| !nominees.contains(*id)).cloned() {
        let request = DecisionRequest::new(holder.clone(), DecisionType::Veto, nominees.clone(), week, GamePhase::PovMeeting);
        let decision = session.decide(request).await;
        println!("\n  {} holds the veto: {}", name_of(session, &holder), decision.reasoning);
        say(session, &holder, Situation::Veto, DialogueContext::new(GamePhase::PovMeeting)).await;
    }

    let mut tally: HashMap<ParticipantId, u32> = HashMap::new();
    let voters: Vec<ParticipantId> = rest.iter().filter(|id| !nominees.contains(*id)).cloned().collect();
    for voter in voters {
        let request = DecisionRequest::new(voter.clone(), DecisionType::Vote, nominees.clone(), week, GamePhase::Eviction);
        if let Some(choice) = session.decide(request).await.choice {
            println!("  {} votes to evict {}", name_of(session, &voter), name_of(session, &choice));
            *tally.entry(choice).or_default() += 1;
        }
    }

    let evicted = nominees
        .iter()
        .max_by_key(|id| tally.get(*id).copied().unwrap_or(0))
        .cloned()?;
    println!("\n  {} has been evicted", name_of(session, &evicted));
    say(session, &evicted, Situation::Eviction, DialogueContext::new(GamePhase::Eviction)).await;

    if let Some(mut participant) = session.roster().get(&evicted).cloned() {
        participant.status.is_evicted = true;
        session.update_participant(participant);
    }
    Some(evicted)
}

async fn run_story_turns(session: &mut GameSession, player_id: &str, week: u32, turns: u32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    println!("\n== Story turns ==");

    for turn in 0..turns {
        let day = turn / 3 + 1;
        if turn % 3 == 0 {
            session.begin_day(day);
        }
        let phase = GamePhase::ALL[turn as usize % GamePhase::ALL.len()];
        let context = TurnContext::new(player_id, phase, week, day);

        match session.take_story_turn(&context, &mut rng) {
            TurnOutcome::Idle => continue,
            outcome => info!(?outcome, "Story turn"),
        }

        let Some((event_id, title, choice_id, choice_text)) = session.present_next_event().and_then(|event| {
            event
                .options
                .first()
                .map(|option| (event.id.clone(), event.title.clone(), option.id.clone(), option.text.clone()))
        }) else {
            continue;
        };

        println!("  Day {} [{}] {} -> {}", day, phase, title, choice_text);
        match session.resolve_event(&event_id, &choice_id, player_id, week).await {
            Ok(resolution) => {
                if let Some(storyline) = resolution.completed_storyline {
                    println!("    Storyline '{}' wrapped up", storyline);
                }
            }
            Err(e) => println!("    Could not resolve {}: {}", event_id, e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let roster = match &args.roster {
        Some(path) => load_roster_json(&std::fs::read_to_string(path)?)?,
        None => demo_roster(),
    };

    let memory_cap = config.memory.max_entries_per_participant;
    let mut session = GameSession::from_config(config, roster);
    if let Some(root) = &args.store {
        session = session.with_store(Arc::new(JsonFileStore::new(root).with_max_entries(memory_cap)));
    }
    session.initialize().await;

    let player_id = session
        .roster()
        .iter()
        .find(|p| p.status.is_player_controlled)
        .or_else(|| session.roster().iter().next())
        .map(|p| p.id.clone())
        .ok_or("Roster is empty")?;

    run_ceremonies(&mut session, args.week).await;
    run_story_turns(&mut session, &player_id, args.week, args.turns, args.seed).await;

    println!("\n== Memory ==");
    for participant in session.roster().iter() {
        println!("  {}: {} entries", participant.name, session.memory().memory_count(&participant.id));
    }
    Ok(())
}
