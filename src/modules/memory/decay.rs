//! Pure ranking and decay functions over memory entries.
//!
//! Nothing here mutates an entry: the ledger keeps pristine importance values
//! and these projections are recomputed against whatever clock the caller
//! passes in.

use crate::modules::memory::store::MemoryEntry;

pub const MS_PER_DAY: f64 = 86_400_000.0;
pub const EFFECTIVE_IMPORTANCE_FLOOR: f32 = 1.0;

/// `importance * 2 + timestamp / now`, used to decide which entries survive the cap.
pub fn retention_weight(entry: &MemoryEntry, now_ms: i64) -> f64 {
    let recency_fraction = if now_ms > 0 {
        entry.timestamp as f64 / now_ms as f64
    } else {
        0.0
    };
    entry.importance as f64 * 2.0 + recency_fraction
}

pub fn age_in_days(entry: &MemoryEntry, now_ms: i64) -> f64 {
    ((now_ms - entry.timestamp).max(0)) as f64 / MS_PER_DAY
}

/// `max(1, importance * decay_factor ^ (age_days / 7))`
pub fn effective_importance(entry: &MemoryEntry, now_ms: i64) -> f32 {
    let decay_factor = entry.decay_factor_or_default() as f64;
    let weeks = age_in_days(entry, now_ms) / 7.0;
    let projected = entry.importance as f64 * decay_factor.powf(weeks);
    (projected as f32).max(EFFECTIVE_IMPORTANCE_FLOOR)
}

/// Stable descending sort by retention weight followed by truncation.
pub fn rank_and_truncate(entries: &mut Vec<MemoryEntry>, now_ms: i64, cap: usize) {
    entries.sort_by(|a, b| retention_weight(b, now_ms).total_cmp(&retention_weight(a, now_ms)));
    entries.truncate(cap);
}
