use serde::{Deserialize, Serialize};

use crate::api::types::ParticipantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationshipType {
    Enemy,
    Rival,
    #[default]
    Neutral,
    Friend,
    Ally,
}

impl RelationshipType {
    pub fn is_positive(&self) -> bool {
        matches!(self, RelationshipType::Friend | RelationshipType::Ally)
    }

    pub fn is_hostile(&self) -> bool {
        matches!(self, RelationshipType::Enemy | RelationshipType::Rival)
    }
}

/// Directed edge from the owning participant towards `target_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub target_id: ParticipantId,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub extra_points: i32,
    #[serde(default)]
    pub is_mutual: bool,
    #[serde(default)]
    pub is_permanent: bool,
}

impl Relationship {
    pub fn new(target_id: impl Into<ParticipantId>, relationship_type: RelationshipType) -> Self {
        Self {
            target_id: target_id.into(),
            relationship_type,
            extra_points: 0,
            is_mutual: false,
            is_permanent: false,
        }
    }

    pub fn with_extra_points(mut self, extra_points: i32) -> Self {
        self.extra_points = extra_points;
        self
    }

    pub fn mutual(mut self) -> Self {
        self.is_mutual = true;
        self
    }

    pub fn permanent(mut self) -> Self {
        self.is_permanent = true;
        self
    }
}
