//! Side-effect-free scores over participant data.
//!
//! The `rank_*` helpers sort candidate ids with a stable sort, so candidates
//! with equal scores keep the order the caller passed them in.

use std::cmp::Ordering;

use crate::api::types::ParticipantId;
use crate::modules::participant::{Participant, Relationship, RelationshipType, Roster};

pub fn threat_level(participant: &Participant) -> f32 {
    let attributes = &participant.attributes;
    let wins = (participant.status.hoh_wins + participant.status.pov_wins) as f32;
    let skill = (attributes.physical as f32 + 1.5 * attributes.strategic as f32 + attributes.social as f32) / 3.0;
    2.0 * wins + skill
}

pub fn relationship_score(relationship_type: RelationshipType) -> i32 {
    match relationship_type {
        RelationshipType::Enemy => -2,
        RelationshipType::Rival => -1,
        RelationshipType::Neutral => 0,
        RelationshipType::Friend => 1,
        RelationshipType::Ally => 2,
    }
}

/// Type score nudged by the relationship's extra points.
pub fn relationship_strength(relationship: &Relationship) -> f32 {
    relationship_score(relationship.relationship_type) as f32 + relationship.extra_points as f32 / 10.0
}

/// Rewards complementary competition skill, penalises divergent loyalty and social play.
pub fn compatibility(a: &Participant, b: &Participant) -> i32 {
    let (x, y) = (&a.attributes, &b.attributes);
    let diff = |l: u8, r: u8| (l as i32 - r as i32).abs();

    diff(x.physical, y.physical)
        + diff(x.strategic, y.strategic)
        + (5 - diff(x.loyalty, y.loyalty))
        + (5 - diff(x.social, y.social))
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Candidates missing from the roster score zero.
pub fn rank_by_threat(roster: &Roster, candidate_ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut ranked: Vec<(ParticipantId, f32)> = candidate_ids
        .iter()
        .map(|id| (id.clone(), roster.get(id).map(threat_level).unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Weakest bond from `actor`'s point of view first.
pub fn rank_by_relationship_ascending(actor: &Participant, candidate_ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut ranked: Vec<(ParticipantId, i32)> = candidate_ids
        .iter()
        .map(|id| (id.clone(), relationship_score(actor.relationship_type_with(id))))
        .collect();
    ranked.sort_by_key(|(_, score)| *score);
    ranked.into_iter().map(|(id, _)| id).collect()
}

pub fn rank_by_compatibility(actor: &Participant, roster: &Roster, candidate_ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut ranked: Vec<(ParticipantId, i32)> = candidate_ids
        .iter()
        .map(|id| (id.clone(), roster.get(id).map(|c| compatibility(actor, c)).unwrap_or(i32::MIN)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::participant::{Attributes, ParticipantStatus};

    fn with_skills(id: &str, physical: u8, strategic: u8, loyalty: u8, social: u8) -> Participant {
        Participant::new(id, id).with_attributes(Attributes {
            physical,
            strategic,
            loyalty,
            social,
            ..Attributes::default()
        })
    }

    #[test]
    fn test_threat_level_formula() {
        let participant = with_skills("a", 3, 4, 3, 3).with_status(ParticipantStatus {
            hoh_wins: 2,
            pov_wins: 1,
            ..Default::default()
        });
        // 2 * 3 + (3 + 6 + 3) / 3
        assert!((threat_level(&participant) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_relationship_score_mapping() {
        assert_eq!(relationship_score(RelationshipType::Enemy), -2);
        assert_eq!(relationship_score(RelationshipType::Rival), -1);
        assert_eq!(relationship_score(RelationshipType::Neutral), 0);
        assert_eq!(relationship_score(RelationshipType::Friend), 1);
        assert_eq!(relationship_score(RelationshipType::Ally), 2);
    }

    #[test]
    fn test_relationship_strength_uses_extra_points() {
        let relationship = Relationship::new("b", RelationshipType::Friend).with_extra_points(5);
        assert!((relationship_strength(&relationship) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_compatibility_formula() {
        let a = with_skills("a", 5, 1, 4, 4);
        let b = with_skills("b", 1, 5, 4, 3);
        // |5-1| + |1-5| + (5-0) + (5-1)
        assert_eq!(compatibility(&a, &b), 17);
        assert_eq!(compatibility(&a, &b), compatibility(&b, &a));
    }

    #[test]
    fn test_rank_by_threat_is_stable() {
        let roster = Roster::new(vec![
            with_skills("x", 3, 3, 3, 3),
            with_skills("y", 3, 3, 3, 3),
            with_skills("z", 5, 5, 3, 5),
        ]);
        let ranked = rank_by_threat(&roster, &["x".into(), "y".into(), "z".into()]);
        assert_eq!(ranked, vec!["z".to_string(), "x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_rank_by_relationship_ascending() {
        let actor = Participant::new("me", "Me")
            .with_relationship(Relationship::new("friend", RelationshipType::Friend))
            .with_relationship(Relationship::new("enemy", RelationshipType::Enemy));
        let ranked = rank_by_relationship_ascending(&actor, &["friend".into(), "stranger".into(), "enemy".into()]);
        assert_eq!(ranked, vec!["enemy".to_string(), "stranger".to_string(), "friend".to_string()]);
    }

    #[test]
    fn test_rank_by_compatibility() {
        let actor = with_skills("me", 5, 1, 4, 4);
        let roster = Roster::new(vec![with_skills("twin", 5, 1, 4, 4), with_skills("complement", 1, 5, 4, 4)]);
        let ranked = rank_by_compatibility(&actor, &roster, &["twin".into(), "complement".into()]);
        assert_eq!(ranked[0], "complement");
    }
}
