use std::collections::HashSet;

use crate::modules::participant::{Participant, Roster};

pub fn parse_roster_json(roster_json: &str) -> Result<Vec<Participant>, String> {
    if roster_json.trim().is_empty() {
        return Err("Roster string is empty".to_string());
    }
    serde_json::from_str(roster_json).map_err(|e| format!("Failed to parse roster: {}", e))
}

/// Checks every profile plus id uniqueness and relationship targets.
pub fn validate_roster(participants: &[Participant]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for participant in participants {
        participant.validate()?;
        if !seen.insert(participant.id.as_str()) {
            return Err(format!("Duplicate participant ID: {}", participant.id));
        }
    }

    for participant in participants {
        for relationship in &participant.relationships {
            if relationship.target_id == participant.id {
                return Err(format!("Participant {} has a relationship with itself", participant.id));
            }
            if !seen.contains(relationship.target_id.as_str()) {
                return Err(format!(
                    "Participant {} has a relationship with unknown participant {}",
                    participant.id, relationship.target_id
                ));
            }
        }
    }

    Ok(())
}

pub fn load_roster_json(roster_json: &str) -> Result<Roster, String> {
    let participants = parse_roster_json(roster_json)?;
    validate_roster(&participants)?;
    Ok(Roster::new(participants))
}
