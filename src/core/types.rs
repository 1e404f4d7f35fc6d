//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for units on the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Team (owner) identifier. Units sharing a team are friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns true if the other team is hostile to this one
    pub fn is_enemy_of(&self, other: &TeamId) -> bool {
        self != other
    }
}
