//! Orderings over borrowed events. All sorts are stable.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::api::types::GamePhase;
use crate::modules::catalog::filter::EventCategory;
use crate::modules::storyline::StoryEvent;

const EFFECT_WEIGHT: f32 = 0.5;

/// `category default + 0.5 * max |effect| + max option importance`.
pub fn priority_score(event: &StoryEvent) -> f32 {
    EventCategory::of(event).default_priority()
        + EFFECT_WEIGHT * event.max_effect_magnitude() as f32
        + event.max_option_importance()
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn sort_by_priority(events: &mut [&StoryEvent]) {
    events.sort_by(|a, b| descending(priority_score(a), priority_score(b)));
}

pub fn sort_by_phase_relevance(events: &mut [&StoryEvent], phase: GamePhase) {
    events.sort_by(|a, b| descending(a.phase_probability(phase), b.phase_probability(phase)));
}

pub fn sort_by_category(events: &mut [&StoryEvent]) {
    events.sort_by_key(|event| EventCategory::of(event).rank());
}

/// Groups by storyline id, then sequence. Standalone events go last.
pub fn sort_by_storyline_sequence(events: &mut [&StoryEvent]) {
    events.sort_by(|a, b| match (&a.storyline_id, &b.storyline_id) {
        (Some(x), Some(y)) => x.cmp(y).then(a.sequence.cmp(&b.sequence)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn phase_then_priority(a: &StoryEvent, b: &StoryEvent, phase: GamePhase) -> Ordering {
    descending(a.phase_probability(phase), b.phase_probability(phase))
        .then_with(|| descending(priority_score(a), priority_score(b)))
}

/// Continuations of active storylines first, each group by phase relevance then priority.
pub fn smart_sort(events: &mut [&StoryEvent], phase: GamePhase, active_storylines: &HashSet<String>) {
    let is_continuation = |event: &StoryEvent| {
        event
            .storyline_id
            .as_ref()
            .map(|id| active_storylines.contains(id))
            .unwrap_or(false)
    };

    events.sort_by(|a, b| {
        is_continuation(*b)
            .cmp(&is_continuation(*a))
            .then_with(|| phase_then_priority(a, b, phase))
    });
}
