use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::api::types::{GamePhase, ParticipantId};
use crate::config::MemoryConfig;
use crate::modules::memory::decay::{effective_importance, rank_and_truncate, EFFECTIVE_IMPORTANCE_FLOOR};

/// Well-known values for [`MemoryEntry::memory_type`].
pub mod memory_types {
    pub const BETRAYAL: &str = "betrayal";
    pub const CONVERSATION: &str = "conversation";
    pub const COMPETITION: &str = "competition";
    pub const HOH_WIN: &str = "hoh_win";
    pub const NOMINATION: &str = "nomination";
    pub const EVICTION: &str = "eviction";
    pub const ALLIANCE: &str = "alliance";
    pub const STORYLINE: &str = "storyline";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryImpact {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl MemoryImpact {
    pub fn from_effect(effect: i32) -> Self {
        match effect {
            e if e > 0 => MemoryImpact::Positive,
            e if e < 0 => MemoryImpact::Negative,
            _ => MemoryImpact::Neutral,
        }
    }

    pub fn default_emotion(&self) -> &'static str {
        match self {
            MemoryImpact::Positive => "grateful",
            MemoryImpact::Negative => "resentful",
            MemoryImpact::Neutral => "indifferent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    #[serde(rename = "type")]
    pub memory_type: String,
    pub week: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_participant_id: Option<ParticipantId>,
    #[serde(default)]
    pub impact: MemoryImpact,
    pub importance: f32,
    /// Epoch milliseconds, stamped on insertion.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_factor: Option<f32>,
}

impl MemoryEntry {
    pub fn new(memory_type: impl Into<String>, week: u32, description: impl Into<String>, importance: f32) -> Self {
        Self {
            memory_type: memory_type.into(),
            week,
            description: description.into(),
            related_participant_id: None,
            impact: MemoryImpact::Neutral,
            importance,
            timestamp: 0,
            emotion: None,
            decay_factor: None,
        }
    }

    pub fn with_related(mut self, participant_id: impl Into<ParticipantId>) -> Self {
        self.related_participant_id = Some(participant_id.into());
        self
    }

    pub fn with_impact(mut self, impact: MemoryImpact) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn with_decay_factor(mut self, decay_factor: f32) -> Self {
        self.decay_factor = Some(decay_factor);
        self
    }

    /// `importance / 5`, kept inside (0, 1].
    pub fn default_decay_factor(importance: f32) -> f32 {
        if importance.is_nan() {
            return 1.0;
        }
        (importance / 5.0).clamp(0.05, 1.0)
    }

    pub fn decay_factor_or_default(&self) -> f32 {
        self.decay_factor
            .unwrap_or_else(|| Self::default_decay_factor(self.importance))
    }

    pub fn is_about(&self, participant_id: &str) -> bool {
        self.related_participant_id.as_deref() == Some(participant_id)
    }

    /// Pulls importance up to at least 1 and replaces a decay factor outside (0, 1].
    fn sanitize(&mut self) {
        if !self.importance.is_finite() || self.importance < EFFECTIVE_IMPORTANCE_FLOOR {
            warn!(
                "Memory '{}' has importance {}, storing {}",
                self.description, self.importance, EFFECTIVE_IMPORTANCE_FLOOR
            );
            self.importance = EFFECTIVE_IMPORTANCE_FLOOR;
        }
        if let Some(decay_factor) = self.decay_factor {
            if !(decay_factor > 0.0 && decay_factor <= 1.0) {
                let replacement = Self::default_decay_factor(self.importance);
                warn!(
                    "Memory '{}' has decay factor {}, storing {}",
                    self.description, decay_factor, replacement
                );
                self.decay_factor = Some(replacement);
            }
        }
    }

    fn fill_defaults(&mut self) {
        if self.emotion.is_none() {
            self.emotion = Some(self.impact.default_emotion().to_string());
        }
        if self.decay_factor.is_none() {
            self.decay_factor = Some(Self::default_decay_factor(self.importance));
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.memory_type.is_empty() {
            return Err(format!("Memory '{}' has an empty type", self.description));
        }
        if !self.importance.is_finite() || self.importance <= 0.0 {
            return Err(format!(
                "Memory '{}' has invalid importance: {} (must be positive)",
                self.description, self.importance
            ));
        }
        if let Some(decay_factor) = self.decay_factor {
            if !(decay_factor > 0.0 && decay_factor <= 1.0) {
                return Err(format!(
                    "Memory '{}' has invalid decay factor: {} (must be in (0, 1])",
                    self.description, decay_factor
                ));
            }
        }
        Ok(())
    }
}

/// Selects memories that should resurface in the current situation.
#[derive(Debug, Clone, Default)]
pub struct TriggerContext {
    pub phase: Option<GamePhase>,
    pub participant_id: Option<ParticipantId>,
    pub memory_type: Option<String>,
}

impl TriggerContext {
    pub fn for_phase(phase: GamePhase) -> Self {
        Self {
            phase: Some(phase),
            ..Self::default()
        }
    }

    pub fn with_participant(mut self, participant_id: impl Into<ParticipantId>) -> Self {
        self.participant_id = Some(participant_id.into());
        self
    }

    pub fn with_memory_type(mut self, memory_type: impl Into<String>) -> Self {
        self.memory_type = Some(memory_type.into());
        self
    }

    fn matches(&self, entry: &MemoryEntry) -> bool {
        let phase_match = self
            .phase
            .map(|phase| entry.memory_type.to_lowercase().contains(phase.as_str()))
            .unwrap_or(false);
        let participant_match = self
            .participant_id
            .as_deref()
            .map(|id| entry.is_about(id))
            .unwrap_or(false);
        let type_match = self
            .memory_type
            .as_deref()
            .map(|memory_type| entry.memory_type == memory_type)
            .unwrap_or(false);

        phase_match || participant_match || type_match
    }
}

/// Per-participant ledger of weighted, decaying memories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    config: MemoryConfig,
    ledger: HashMap<ParticipantId, Vec<MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_config(MemoryConfig::default())
    }

    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            ledger: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Stamps, sanitizes, appends, re-ranks and truncates. Returns the stored entry.
    pub fn add_entry(&mut self, participant_id: &str, entry: MemoryEntry) -> MemoryEntry {
        self.add_entry_at(participant_id, entry, Self::now_ms())
    }

    pub fn add_entry_at(&mut self, participant_id: &str, mut entry: MemoryEntry, now_ms: i64) -> MemoryEntry {
        entry.timestamp = now_ms;
        entry.sanitize();
        entry.fill_defaults();

        let cap = self.config.max_entries_per_participant;
        let entries = self.ledger.entry(participant_id.to_string()).or_default();
        entries.push(entry.clone());
        rank_and_truncate(entries, now_ms, cap);

        entry
    }

    /// Replaces a participant's ledger with persisted entries, keeping their timestamps.
    pub fn import(&mut self, participant_id: &str, records: Vec<MemoryEntry>) -> Result<(), String> {
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|e| format!("Record at index {}: {}", index, e))?;
        }

        let now_ms = Self::now_ms();
        let mut entries: Vec<MemoryEntry> = records
            .into_iter()
            .map(|mut record| {
                if record.timestamp <= 0 {
                    record.timestamp = now_ms;
                }
                record.fill_defaults();
                record
            })
            .collect();
        rank_and_truncate(&mut entries, now_ms, self.config.max_entries_per_participant);

        self.ledger.insert(participant_id.to_string(), entries);
        Ok(())
    }

    /// Raw ledger entries with pristine importance, in ranked order.
    pub fn entries(&self, participant_id: &str) -> &[MemoryEntry] {
        self.ledger
            .get(participant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_memory(&self, participant_id: &str) -> Vec<MemoryEntry> {
        self.get_memory_at(participant_id, Self::now_ms())
    }

    /// Decay projection: each copy carries its effective importance at `now_ms`.
    pub fn get_memory_at(&self, participant_id: &str, now_ms: i64) -> Vec<MemoryEntry> {
        self.entries(participant_id)
            .iter()
            .map(|entry| {
                let mut projected = entry.clone();
                projected.importance = effective_importance(entry, now_ms);
                projected
            })
            .collect()
    }

    pub fn get_relationship_memories(&self, participant_id: &str, related_id: &str) -> Vec<MemoryEntry> {
        self.get_memory(participant_id)
            .into_iter()
            .filter(|entry| entry.is_about(related_id))
            .collect()
    }

    pub fn get_triggered_memories(&self, participant_id: &str, context: &TriggerContext) -> Vec<MemoryEntry> {
        self.get_memory(participant_id)
            .into_iter()
            .filter(|entry| context.matches(entry))
            .take(self.config.triggered_limit)
            .collect()
    }

    /// Most recent first.
    pub fn get_recent(&self, participant_id: &str, count: usize) -> Vec<MemoryEntry> {
        let mut memories = self.get_memory(participant_id);
        memories.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        memories.truncate(count);
        memories
    }

    pub fn memory_count(&self, participant_id: &str) -> usize {
        self.ledger.get(participant_id).map(Vec::len).unwrap_or(0)
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.ledger.keys()
    }

    pub fn clear_all(&mut self) {
        self.ledger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_test_mock::fixtures::memory_fixtures;
    use crate::modules::memory::decay::MS_PER_DAY;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_memory_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.config().max_entries_per_participant, 30);
        assert_eq!(store.memory_count("anyone"), 0);
    }

    #[test]
    fn test_add_entry_stamps_defaults() {
        let mut store = MemoryStore::new();
        let stored = store.add_entry_at(
            "hg-1",
            MemoryEntry::new(memory_types::CONVERSATION, 1, "Chatted in the kitchen", 3.0)
                .with_impact(MemoryImpact::Positive),
            NOW,
        );

        assert_eq!(stored.timestamp, NOW);
        assert_eq!(stored.emotion.as_deref(), Some("grateful"));
        assert!((stored.decay_factor.unwrap() - 0.6).abs() < 1e-6);
        assert_eq!(store.memory_count("hg-1"), 1);
    }

    #[test]
    fn test_add_entry_keeps_explicit_emotion_and_decay() {
        let mut store = MemoryStore::new();
        let stored = store.add_entry_at(
            "hg-1",
            MemoryEntry::new(memory_types::BETRAYAL, 2, "Flipped the vote", 5.0)
                .with_emotion("furious")
                .with_decay_factor(0.95),
            NOW,
        );

        assert_eq!(stored.emotion.as_deref(), Some("furious"));
        assert_eq!(stored.decay_factor, Some(0.95));
    }

    #[test]
    fn test_high_importance_decay_factor_is_clamped() {
        assert_eq!(MemoryEntry::default_decay_factor(7.0), 1.0);
        assert!((MemoryEntry::default_decay_factor(2.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stored_importance_stays_pristine() {
        let mut store = MemoryStore::new();
        store.add_entry_at(
            "hg-1",
            MemoryEntry::new(memory_types::NOMINATION, 1, "Put on the block", 5.0).with_decay_factor(0.8),
            NOW,
        );

        let later = NOW + (21.0 * MS_PER_DAY) as i64;
        let projected = store.get_memory_at("hg-1", later);
        assert!(projected[0].importance < 5.0);
        assert_eq!(store.entries("hg-1")[0].importance, 5.0);
    }

    #[test]
    fn test_relationship_memories_filter() {
        let mut store = MemoryStore::new();
        for entry in memory_fixtures() {
            store.add_entry("hg-1", entry);
        }

        let about_blake = store.get_relationship_memories("hg-1", "hg-2");
        assert!(!about_blake.is_empty());
        assert!(about_blake.iter().all(|m| m.is_about("hg-2")));
    }

    #[test]
    fn test_triggered_memories_by_phase_and_cap() {
        let mut store = MemoryStore::new();
        for week in 1..=5 {
            store.add_entry(
                "hg-1",
                MemoryEntry::new(memory_types::NOMINATION, week, format!("Nominated in week {}", week), 3.0),
            );
        }
        store.add_entry("hg-1", MemoryEntry::new(memory_types::CONVERSATION, 1, "Small talk", 2.0));

        let triggered = store.get_triggered_memories("hg-1", &TriggerContext::for_phase(GamePhase::Nomination));
        assert_eq!(triggered.len(), 3);
        assert!(triggered.iter().all(|m| m.memory_type == memory_types::NOMINATION));
    }

    #[test]
    fn test_triggered_memories_by_participant_or_type() {
        let mut store = MemoryStore::new();
        store.add_entry(
            "hg-1",
            MemoryEntry::new(memory_types::CONVERSATION, 1, "Shared a secret", 2.0).with_related("hg-5"),
        );
        store.add_entry("hg-1", MemoryEntry::new(memory_types::ALLIANCE, 1, "Formed the trio", 4.0));
        store.add_entry("hg-1", MemoryEntry::new(memory_types::COMPETITION, 1, "Lost the wall", 2.0));

        let context = TriggerContext::default()
            .with_participant("hg-5")
            .with_memory_type(memory_types::ALLIANCE);
        let triggered = store.get_triggered_memories("hg-1", &context);
        assert_eq!(triggered.len(), 2);
    }

    #[test]
    fn test_import_validates_and_keeps_timestamps() {
        let mut store = MemoryStore::new();
        let mut record = MemoryEntry::new(memory_types::EVICTION, 3, "Watched a friend leave", 4.0);
        record.timestamp = NOW;
        assert!(store.import("hg-1", vec![record]).is_ok());
        assert_eq!(store.entries("hg-1")[0].timestamp, NOW);

        let invalid = MemoryEntry::new("", 1, "No type", 2.0);
        let err = store.import("hg-1", vec![invalid]).unwrap_err();
        assert!(err.contains("empty type"));

        let zero = MemoryEntry::new(memory_types::CONVERSATION, 1, "Zero", 0.0);
        assert!(store.import("hg-1", vec![zero]).is_err());
    }

    #[test]
    fn test_get_recent_orders_by_timestamp() {
        let mut store = MemoryStore::new();
        store.add_entry_at("hg-1", MemoryEntry::new(memory_types::CONVERSATION, 1, "old", 5.0), NOW);
        store.add_entry_at("hg-1", MemoryEntry::new(memory_types::CONVERSATION, 1, "new", 1.0), NOW + 1_000);

        let recent = store.get_recent("hg-1", 1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].description, "new");
    }

    #[test]
    fn test_clear_all() {
        let mut store = MemoryStore::new();
        store.add_entry("hg-1", MemoryEntry::new(memory_types::CONVERSATION, 1, "a", 1.0));
        store.add_entry("hg-2", MemoryEntry::new(memory_types::CONVERSATION, 1, "b", 1.0));
        store.clear_all();
        assert_eq!(store.memory_count("hg-1"), 0);
        assert_eq!(store.participants().count(), 0);
    }

    #[test]
    fn test_memory_entry_json_shape() {
        let entry = MemoryEntry::new(memory_types::BETRAYAL, 4, "Backdoored", 5.0)
            .with_related("hg-3")
            .with_impact(MemoryImpact::Negative);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "betrayal");
        assert_eq!(json["relatedParticipantId"], "hg-3");
        assert_eq!(json["impact"], "negative");
    }
}
