use crate::modules::memory::{MemoryEntry, MemoryStore};

pub fn import_memory_json(store: &mut MemoryStore, participant_id: &str, memory_json: &str) -> Result<(), String> {
    if memory_json.trim().is_empty() {
        return Ok(());
    }

    let records: Vec<MemoryEntry> =
        serde_json::from_str(memory_json).map_err(|e| format!("Failed to parse memory: {}", e))?;

    store
        .import(participant_id, records)
        .map_err(|e| format!("Failed to import memory: {}", e))
}

/// Pristine stored entries, not the decayed projection.
pub fn export_memory_json(store: &MemoryStore, participant_id: &str) -> Result<String, String> {
    serde_json::to_string(store.entries(participant_id)).map_err(|e| format!("Failed to serialize memory: {}", e))
}
