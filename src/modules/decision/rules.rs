use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::types::ParticipantId;
use crate::modules::memory::{memory_types, MemoryEntry, MemoryImpact};
use crate::modules::participant::{Participant, RelationshipType, Roster};
use crate::modules::scoring::{rank_by_compatibility, rank_by_relationship_ascending, rank_by_threat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionType {
    Nominate,
    Vote,
    Veto,
    Alliance,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Nominate => "nominate",
            DecisionType::Vote => "vote",
            DecisionType::Veto => "veto",
            DecisionType::Alliance => "alliance",
        }
    }

    /// Memory type written for this decision; contains the matching phase name.
    pub fn memory_type(&self) -> &'static str {
        match self {
            DecisionType::Nominate => "nomination_decision",
            DecisionType::Vote => "eviction_vote",
            DecisionType::Veto => "pov_veto_decision",
            DecisionType::Alliance => "alliance_decision",
        }
    }

    pub fn impact(&self) -> MemoryImpact {
        match self {
            DecisionType::Nominate | DecisionType::Vote => MemoryImpact::Negative,
            DecisionType::Alliance => MemoryImpact::Positive,
            DecisionType::Veto => MemoryImpact::Neutral,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            DecisionType::Nominate => "nominate",
            DecisionType::Vote => "vote to evict",
            DecisionType::Veto => "use the veto on",
            DecisionType::Alliance => "propose an alliance with",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecision {
    pub choice: Option<ParticipantId>,
    pub reasoning: String,
}

impl LocalDecision {
    fn pick(choice: Option<ParticipantId>, reasoning: impl Into<String>) -> Self {
        Self {
            choice,
            reasoning: reasoning.into(),
        }
    }
}

fn display_name<'a>(roster: &'a Roster, id: &'a str) -> &'a str {
    roster.get(id).map(|p| p.name.as_str()).unwrap_or(id)
}

/// Most recent betrayal memory naming one of the candidates.
pub fn grudge_target(recent_memory: &[MemoryEntry], candidate_ids: &[ParticipantId]) -> Option<ParticipantId> {
    recent_memory
        .iter()
        .filter(|m| m.memory_type == memory_types::BETRAYAL)
        .filter_map(|m| {
            m.related_participant_id
                .as_ref()
                .filter(|id| candidate_ids.contains(*id))
                .map(|id| (m.timestamp, id))
        })
        .max_by_key(|(timestamp, _)| *timestamp)
        .map(|(_, id)| id.clone())
}

fn threat_or_bond(
    actor: &Participant,
    roster: &Roster,
    candidate_ids: &[ParticipantId],
    prefers_threats: bool,
) -> LocalDecision {
    if prefers_threats {
        let choice = rank_by_threat(roster, candidate_ids).into_iter().next();
        let reasoning = match &choice {
            Some(id) => format!("{} is the biggest threat left in the game", display_name(roster, id)),
            None => "No candidates available".to_string(),
        };
        LocalDecision::pick(choice, reasoning)
    } else {
        let choice = rank_by_relationship_ascending(actor, candidate_ids).into_iter().next();
        let reasoning = match &choice {
            Some(id) => format!("I have the weakest bond with {}", display_name(roster, id)),
            None => "No candidates available".to_string(),
        };
        LocalDecision::pick(choice, reasoning)
    }
}

/// Rule-based choice. Always returns the first candidate when no branch applies,
/// and `None` only for an empty candidate list.
pub fn decide_locally(
    actor: &Participant,
    roster: &Roster,
    decision_type: DecisionType,
    candidate_ids: &[ParticipantId],
    recent_memory: &[MemoryEntry],
) -> LocalDecision {
    if candidate_ids.is_empty() {
        return LocalDecision::pick(None, "No candidates available");
    }

    let attributes = &actor.attributes;
    let decision = match decision_type {
        DecisionType::Nominate => threat_or_bond(actor, roster, candidate_ids, attributes.strategic > attributes.social),
        DecisionType::Vote => match grudge_target(recent_memory, candidate_ids) {
            Some(id) => {
                let reasoning = format!("{} betrayed me and I have not forgotten it", display_name(roster, &id));
                LocalDecision::pick(Some(id), reasoning)
            }
            None => threat_or_bond(actor, roster, candidate_ids, attributes.strategic > attributes.loyalty),
        },
        DecisionType::Veto => {
            let allies = candidate_ids
                .iter()
                .filter(|id| actor.relationship_type_with(id) == RelationshipType::Ally);
            let friends = candidate_ids
                .iter()
                .filter(|id| actor.relationship_type_with(id) == RelationshipType::Friend);

            match allies.chain(friends).next() {
                Some(id) => LocalDecision::pick(
                    Some(id.clone()),
                    format!("{} has been loyal to me, so I am saving them", display_name(roster, id)),
                ),
                None => LocalDecision::pick(None, ""),
            }
        }
        DecisionType::Alliance => {
            let choice = rank_by_compatibility(actor, roster, candidate_ids).into_iter().next();
            let reasoning = match &choice {
                Some(id) => format!("{} complements my game best", display_name(roster, id)),
                None => String::new(),
            };
            LocalDecision::pick(choice, reasoning)
        }
    };

    if decision.choice.is_some() {
        return decision;
    }

    let fallback = candidate_ids[0].clone();
    let reasoning = format!("Going with {} by default", display_name(roster, &fallback));
    LocalDecision::pick(Some(fallback), reasoning)
}
