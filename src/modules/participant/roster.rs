use std::collections::HashMap;

use crate::modules::participant::profile::Participant;

/// Read-only, id-indexed view of the cast. Iteration keeps insertion order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        let mut roster = Self::default();
        for participant in participants {
            roster.upsert(participant);
        }
        roster
    }

    /// Replaces a participant with the same id, or appends.
    pub fn upsert(&mut self, participant: Participant) {
        match self.index.get(&participant.id) {
            Some(&position) => self.participants[position] = participant,
            None => {
                self.index.insert(participant.id.clone(), self.participants.len());
                self.participants.push(participant);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.index.get(id).map(|&position| &self.participants[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    /// Active participants other than `id` that are not human-controlled.
    pub fn others(&self, id: &str) -> Vec<&Participant> {
        self.active()
            .filter(|p| p.id != id && !p.status.is_player_controlled)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
