use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::modules::participant::Archetype;

pub const SPEAKER_PLACEHOLDER: &str = "{speaker}";
pub const TARGET_PLACEHOLDER: &str = "{target}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Situation {
    Nomination,
    Veto,
    Eviction,
    Hoh,
    General,
    Reaction,
}

impl Situation {
    pub const ALL: [Situation; 6] = [
        Situation::Nomination,
        Situation::Veto,
        Situation::Eviction,
        Situation::Hoh,
        Situation::General,
        Situation::Reaction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Situation::Nomination => "nomination",
            Situation::Veto => "veto",
            Situation::Eviction => "eviction",
            Situation::Hoh => "hoh",
            Situation::General => "general",
            Situation::Reaction => "reaction",
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type TemplateTable = HashMap<(Archetype, Situation), Vec<&'static str>>;

lazy_static! {
    static ref TEMPLATES: TemplateTable = {
        use Archetype::*;
        use Situation::*;

        let mut table: TemplateTable = HashMap::new();

        table.insert((Mastermind, Nomination), vec![
            "{target}, this is purely strategic. You are the biggest obstacle to my endgame.",
            "I've run the numbers, {target}. Sitting you next to the block is the only move that makes sense.",
        ]);
        table.insert((Mastermind, Veto), vec![
            "The veto is a tool, and I use tools when the math says so.",
            "{target}, keeping you safe this week buys me three votes later.",
        ]);
        table.insert((Mastermind, Eviction), vec![
            "My vote for {target} was decided two weeks ago.",
            "Nothing personal, {target}. You were simply next on the board.",
        ]);
        table.insert((Mastermind, Hoh), vec![
            "Head of Household. Now the real planning starts.",
            "Everyone will be in my room tonight, and I'll be listening more than talking.",
        ]);
        table.insert((Mastermind, General), vec![
            "Every conversation in this house is a move on the board.",
            "I'm always three steps ahead, {target}. Keep up.",
        ]);
        table.insert((Mastermind, Reaction), vec![
            "Interesting. That changes the numbers, but not the plan.",
            "I saw that coming, {target}. Adjusting now.",
        ]);

        table.insert((SocialButterfly, Nomination), vec![
            "{target}, I love you, I really do, but I had to make a choice.",
            "This is the hardest thing I've done in here. {target}, please don't hate me.",
        ]);
        table.insert((SocialButterfly, Veto), vec![
            "{target}, you've been such a good friend to me. I'm saving you!",
            "I couldn't sleep at night if I didn't use this veto for {target}.",
        ]);
        table.insert((SocialButterfly, Eviction), vec![
            "{target}, I'm going to miss our late-night talks so much.",
            "This vote breaks my heart, {target}. Hug me before you go?",
        ]);
        table.insert((SocialButterfly, Hoh), vec![
            "HoH room party tonight, everyone is invited!",
            "I just want this week to be drama free. Come talk to me, {target}.",
        ]);
        table.insert((SocialButterfly, General), vec![
            "{target}! Come sit with me, I feel like we never get to talk.",
            "I just love everyone in this house, even when it's hard.",
        ]);
        table.insert((SocialButterfly, Reaction), vec![
            "Oh my gosh, {target}, are you okay?",
            "I did not expect that. Group hug, everyone!",
        ]);

        table.insert((Villain, Nomination), vec![
            "{target}, you're on the block because I want you there. Deal with it.",
            "Pack your bags, {target}. I'm just getting started.",
        ]);
        table.insert((Villain, Veto), vec![
            "This veto stays exactly where it is. Enjoy the block, {target}.",
            "Why would I save anyone? Watching {target} squirm is more fun.",
        ]);
        table.insert((Villain, Eviction), vec![
            "Bye, {target}. Nobody will remember you by Thursday.",
            "I voted {target} out and I'd do it again twice.",
        ]);
        table.insert((Villain, Hoh), vec![
            "Bow down. This house runs through me now.",
            "{target}, I hope you enjoyed your last comfortable week.",
        ]);
        table.insert((Villain, General), vec![
            "Everyone in here is fake except me, {target}.",
            "I'm not here to make friends, I'm here to win.",
        ]);
        table.insert((Villain, Reaction), vec![
            "Cry about it, {target}.",
            "Ha! That's exactly the chaos I live for.",
        ]);

        table.insert((CompBeast, Nomination), vec![
            "{target}, you're a strong competitor and I'd rather face you now than later.",
            "Nothing personal, {target}. Win the veto and prove me wrong.",
        ]);
        table.insert((CompBeast, Veto), vec![
            "I won this veto fair and square, and I'm using it on {target}.",
            "This necklace is staying around my neck. Competitions are my game.",
        ]);
        table.insert((CompBeast, Eviction), vec![
            "Good game, {target}. You were tough to beat.",
            "{target} was a threat in every comp. I had to vote that way.",
        ]);
        table.insert((CompBeast, Hoh), vec![
            "Another win! Bring on the next comp.",
            "I trained my whole life for competitions like that one, {target}.",
        ]);
        table.insert((CompBeast, General), vec![
            "Anyone want to work out? {target}, you in?",
            "I just need to keep winning and I'll be fine.",
        ]);
        table.insert((CompBeast, Reaction), vec![
            "That just means I need to win the next one, {target}.",
            "Pressure is fuel. Let's go.",
        ]);

        table.insert((Floater, Nomination), vec![
            "{target}, I really didn't want to be in this position. I'm sorry.",
            "I went with the house on this one, {target}. Hope you understand.",
        ]);
        table.insert((Floater, Veto), vec![
            "I'll do whatever keeps the peace. {target}, you're safe.",
            "Honestly, I just don't want to rock the boat this week.",
        ]);
        table.insert((Floater, Eviction), vec![
            "I voted with the majority. Sorry, {target}.",
            "It was the house's decision, {target}, not mine alone.",
        ]);
        table.insert((Floater, Hoh), vec![
            "Wow, I did not expect to win that. What do I do now?",
            "{target}, any advice? I just want everyone to get along.",
        ]);
        table.insert((Floater, General), vec![
            "I'm just going with the flow, {target}.",
            "Whatever happens, happens. I'm good with everyone.",
        ]);
        table.insert((Floater, Reaction), vec![
            "Whoa. Okay, {target}, I did not see that coming.",
            "I'm staying out of this one.",
        ]);

        table
    };
}

pub fn templates_for(archetype: Archetype, situation: Situation) -> &'static [&'static str] {
    TEMPLATES
        .get(&(archetype, situation))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn fill_template(template: &str, speaker: &str, target: &str) -> String {
    template
        .replace(SPEAKER_PLACEHOLDER, speaker)
        .replace(TARGET_PLACEHOLDER, target)
}

/// Picks and fills a template. Missing table rows fall back to the floater lines.
pub fn render_local<R: Rng + ?Sized>(
    archetype: Archetype,
    situation: Situation,
    speaker: &str,
    target: &str,
    rng: &mut R,
) -> String {
    let mut candidates = templates_for(archetype, situation);
    if candidates.is_empty() {
        candidates = templates_for(Archetype::Floater, situation);
    }

    match candidates.choose(rng) {
        Some(template) => fill_template(template, speaker, target),
        None => format!("{} has nothing to say.", speaker),
    }
}
