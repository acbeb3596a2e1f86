//! Storyline stage table.
//!
//! Each stage is a plain function keyed by `(storyline_id, sequence)`. The
//! context carries the choices made in earlier stages so a stage can branch
//! its text and options on them.

use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};

use crate::api::types::ParticipantId;
use crate::modules::storyline::event::{EventOption, EventType, StoryEvent};

pub const SECRET_FINAL_TWO: &str = "secret_final_two";
pub const SHOWMANCE: &str = "showmance";
pub const WHISPER_CAMPAIGN: &str = "whisper_campaign";
pub const LETTER_FROM_HOME: &str = "letter_from_home";

const STAGE_FREQUENCY: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct StageContext {
    pub storyline_id: String,
    pub sequence: u32,
    pub target_id: ParticipantId,
    pub target_name: String,
    /// sequence -> chosen option id
    pub prior_choices: BTreeMap<u32, String>,
}

impl StageContext {
    pub fn choice_at(&self, sequence: u32) -> Option<&str> {
        self.prior_choices.get(&sequence).map(String::as_str)
    }
}

pub type StageFn = fn(&StageContext) -> StoryEvent;

#[derive(Debug, Clone, Copy)]
pub struct StorylineDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub stage_count: u32,
}

pub static STORYLINES: [StorylineDefinition; 4] = [
    StorylineDefinition {
        id: SECRET_FINAL_TWO,
        title: "Secret Final Two",
        stage_count: 3,
    },
    StorylineDefinition {
        id: SHOWMANCE,
        title: "Showmance",
        stage_count: 3,
    },
    StorylineDefinition {
        id: WHISPER_CAMPAIGN,
        title: "Whisper Campaign",
        stage_count: 2,
    },
    StorylineDefinition {
        id: LETTER_FROM_HOME,
        title: "Letter From Home",
        stage_count: 2,
    },
];

lazy_static! {
    static ref STAGES: HashMap<(&'static str, u32), StageFn> = {
        let mut table: HashMap<(&'static str, u32), StageFn> = HashMap::new();
        table.insert((SECRET_FINAL_TWO, 1), secret_final_two_offer);
        table.insert((SECRET_FINAL_TWO, 2), secret_final_two_rumor);
        table.insert((SECRET_FINAL_TWO, 3), secret_final_two_test);
        table.insert((SHOWMANCE, 1), showmance_spark);
        table.insert((SHOWMANCE, 2), showmance_spotlight);
        table.insert((SHOWMANCE, 3), showmance_crossroads);
        table.insert((WHISPER_CAMPAIGN, 1), whisper_campaign_rumor);
        table.insert((WHISPER_CAMPAIGN, 2), whisper_campaign_confrontation);
        table.insert((LETTER_FROM_HOME, 1), letter_from_home_offer);
        table.insert((LETTER_FROM_HOME, 2), letter_from_home_aftermath);
        table
    };
}

pub fn stage_event_id(storyline_id: &str, sequence: u32) -> String {
    format!("{}-{}", storyline_id, sequence)
}

pub fn stage(storyline_id: &str, sequence: u32) -> Option<StageFn> {
    STORYLINES
        .iter()
        .find(|s| s.id == storyline_id)
        .and_then(|s| STAGES.get(&(s.id, sequence)).copied())
}

pub fn definition(storyline_id: &str) -> Option<&'static StorylineDefinition> {
    STORYLINES.iter().find(|s| s.id == storyline_id)
}

pub fn is_known(storyline_id: &str) -> bool {
    definition(storyline_id).is_some()
}

/// Builds a stage event and stamps its storyline fields.
pub fn build_stage(context: &StageContext) -> Option<StoryEvent> {
    let generate = stage(&context.storyline_id, context.sequence)?;
    Some(
        generate(context)
            .in_storyline(context.storyline_id.clone(), context.sequence)
            .targeting(context.target_id.clone())
            .in_every_phase(STAGE_FREQUENCY),
    )
}

fn stage_event(context: &StageContext, title: &str, description: String, event_type: EventType) -> StoryEvent {
    StoryEvent::new(
        stage_event_id(&context.storyline_id, context.sequence),
        title,
        description,
        event_type,
    )
}

fn next_stage(context: &StageContext) -> String {
    stage_event_id(&context.storyline_id, context.sequence + 1)
}

fn secret_final_two_offer(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "A Secret Deal",
        format!("{} pulls you into the storage room and offers a secret final two.", name),
        EventType::Alliance,
    )
    .with_option(
        EventOption::new("accept", "Shake on it")
            .with_consequence(format!("You and {} are locked in together", name))
            .with_effect(2, 6.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("stall", "Say you need a few days")
            .with_consequence(format!("{} is not sure where you stand", name))
            .with_effect(0, 3.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("decline", "Turn the deal down")
            .with_consequence(format!("{} walks away stung", name))
            .with_effect(-2, 5.0),
    )
}

fn secret_final_two_rumor(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    let description = match context.choice_at(1) {
        Some("accept") => format!(
            "Someone saw you and {} whispering. The house suspects a final two deal.",
            name
        ),
        _ => format!(
            "{} is telling people you can't be trusted because you never committed.",
            name
        ),
    };

    stage_event(context, "Rumors Spread", description, EventType::Alliance)
        .with_option(
            EventOption::new("protect", format!("Cover for {}", name))
                .with_consequence("The deal survives, for now")
                .with_effect(1, 5.0)
                .leads_to(next_stage(context)),
        )
        .with_option(
            EventOption::new("expose", format!("Expose {} to the house", name))
                .with_consequence(format!("{} is left without allies", name))
                .with_effect(-3, 8.0),
        )
}

fn secret_final_two_test(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "The Deal Is Tested",
        format!("{} is on the block and needs you to keep your word.", name),
        EventType::Alliance,
    )
    .with_option(
        EventOption::new("honor", "Keep your promise")
            .with_consequence(format!("{} will remember this loyalty", name))
            .with_effect(3, 9.0),
    )
    .with_option(
        EventOption::new("betray", "Break the deal")
            .with_consequence(format!("{} feels completely betrayed", name))
            .with_effect(-4, 9.0),
    )
}

fn showmance_spark(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "A Spark",
        format!("You and {} have been talking late into the night on the hammock.", name),
        EventType::Social,
    )
    .with_option(
        EventOption::new("flirt", "Flirt back")
            .with_consequence(format!("{} is smiling a lot more", name))
            .with_effect(2, 5.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("friendzone", "Keep it friendly")
            .with_consequence(format!("{} gets the message", name))
            .with_effect(0, 2.0),
    )
}

fn showmance_spotlight(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "All Eyes On You",
        format!("The house has noticed you and {}. Some see a power couple.", name),
        EventType::Social,
    )
    .with_option(
        EventOption::new("go_public", "Own it in front of everyone")
            .with_consequence("The house now sees you as a pair")
            .with_effect(2, 6.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("downplay", "Downplay it")
            .with_consequence(format!("{} feels hidden away", name))
            .with_effect(-1, 4.0)
            .leads_to(next_stage(context)),
    )
}

fn showmance_crossroads(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    let description = match context.choice_at(2) {
        Some("go_public") => format!(
            "The house wants to split up the showmance. It's you or {} this week.",
            name
        ),
        _ => format!("{} asks whether this was ever real.", name),
    };

    stage_event(context, "Crossroads", description, EventType::Diary)
        .with_option(
            EventOption::new("commit", format!("Stand by {}", name))
                .with_consequence("You face the house together")
                .with_effect(3, 8.0),
        )
        .with_option(
            EventOption::new("split", "End it for your game")
                .with_consequence(format!("{} is heartbroken", name))
                .with_effect(-3, 8.0),
        )
}

fn whisper_campaign_rumor(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "A Whisper Campaign",
        format!("You hear {} has been campaigning against you in the bathroom.", name),
        EventType::Social,
    )
    .with_option(
        EventOption::new("confront", format!("Confront {}", name))
            .with_consequence("Things are about to get loud")
            .with_effect(-1, 5.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("counter", "Start a counter campaign")
            .with_consequence(format!("Half the house now doubts {}", name))
            .with_effect(-2, 6.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("ignore", "Let it go")
            .with_consequence("You stay above the fray")
            .with_effect(0, 2.0),
    )
}

fn whisper_campaign_confrontation(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    let description = match context.choice_at(1) {
        Some("confront") => format!("{} denies everything in front of the whole house.", name),
        _ => format!("{} found out about your counter campaign.", name),
    };

    stage_event(context, "Showdown", description, EventType::Social)
        .with_option(
            EventOption::new("make_peace", "Offer a truce")
                .with_consequence(format!("You and {} reach an uneasy truce", name))
                .with_effect(1, 5.0),
        )
        .with_option(
            EventOption::new("escalate", "Escalate")
                .with_consequence(format!("{} is now a sworn enemy", name))
                .with_effect(-3, 7.0),
        )
}

fn letter_from_home_offer(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    stage_event(
        context,
        "Letter From Home",
        format!(
            "The luxury comp offers a choice: read your letter from home or give {} the chance to read theirs.",
            name
        ),
        EventType::Competition,
    )
    .with_option(
        EventOption::new("keep_letter", "Read your own letter")
            .with_consequence(format!("{} watches you cry happy tears", name))
            .with_effect(-1, 4.0)
            .leads_to(next_stage(context)),
    )
    .with_option(
        EventOption::new("give_letter", format!("Give the letter to {}", name))
            .with_consequence(format!("{} is overwhelmed with gratitude", name))
            .with_effect(3, 7.0)
            .leads_to(next_stage(context)),
    )
}

fn letter_from_home_aftermath(context: &StageContext) -> StoryEvent {
    let name = &context.target_name;
    let description = match context.choice_at(1) {
        Some("give_letter") => format!("{} finds you in the diary room hallway to say thank you.", name),
        _ => format!("{} is quiet around you since the luxury comp.", name),
    };

    stage_event(context, "After The Letters", description, EventType::Diary)
        .with_option(
            EventOption::new("bond", "Open up about home")
                .with_consequence(format!("You and {} share stories for hours", name))
                .with_effect(2, 5.0),
        )
        .with_option(
            EventOption::new("leverage", "Ask for their vote in return")
                .with_consequence(format!("{} feels the gesture was transactional", name))
                .with_effect(-1, 4.0),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(storyline_id: &str, sequence: u32) -> StageContext {
        StageContext {
            storyline_id: storyline_id.to_string(),
            sequence,
            target_id: "hg-2".to_string(),
            target_name: "Sunny".to_string(),
            prior_choices: BTreeMap::new(),
        }
    }

    #[test]
    fn test_every_declared_stage_exists() {
        for definition in STORYLINES {
            for sequence in 1..=definition.stage_count {
                let event = build_stage(&context(definition.id, sequence)).unwrap();
                assert_eq!(event.id, stage_event_id(definition.id, sequence));
                assert_eq!(event.sequence, Some(sequence));
                assert_eq!(event.target_id(), Some("hg-2"));
                assert!(event.options.len() >= 2);
            }
            assert!(stage(definition.id, definition.stage_count + 1).is_none());
        }
    }

    #[test]
    fn test_terminal_stage_has_no_continuations() {
        for definition in STORYLINES {
            let last = build_stage(&context(definition.id, definition.stage_count)).unwrap();
            assert!(last.options.iter().all(|o| o.next_event_id.is_none()));
        }
    }

    #[test]
    fn test_stage_branches_on_prior_choice() {
        let mut accepted = context(SECRET_FINAL_TWO, 2);
        accepted.prior_choices.insert(1, "accept".to_string());
        let mut stalled = context(SECRET_FINAL_TWO, 2);
        stalled.prior_choices.insert(1, "stall".to_string());

        let a = build_stage(&accepted).unwrap();
        let b = build_stage(&stalled).unwrap();
        assert_ne!(a.description, b.description);
        assert!(a.description.contains("final two"));
    }

    #[test]
    fn test_unknown_storyline() {
        assert!(!is_known("alien_invasion"));
        assert!(build_stage(&context("alien_invasion", 1)).is_none());
    }
}
