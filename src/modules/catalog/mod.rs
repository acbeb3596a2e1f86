pub mod filter;
pub mod recommend;
pub mod sort;

pub use filter::{priority_level, EventCategory, EventFilter};
pub use recommend::{recommend, Mood, RecommendationContext, ScoredEvent};
pub use sort::{
    priority_score, smart_sort, sort_by_category, sort_by_phase_relevance, sort_by_priority,
    sort_by_storyline_sequence,
};
