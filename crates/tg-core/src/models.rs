//! # Domain Models
//!
//! These structs represent the game records the server actions mutate.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier handed out by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A player-owned titan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Titan {
    pub id: Uuid,
    pub owner_id: UserId,
    /// Display name, unique per owner (case-insensitive)
    pub name: String,
    pub description: Option<String>,
    /// Starts at 1; progression is handled elsewhere
    pub level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Titan {
    pub const STARTING_LEVEL: i64 = 1;

    pub fn new(owner_id: UserId, name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            name,
            description,
            level: Self::STARTING_LEVEL,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// A short phrase a titan shouts during battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleEmote {
    pub id: Uuid,
    pub titan_id: Uuid,
    pub owner_id: UserId,
    pub phrase: String,
    pub created_at: DateTime<Utc>,
}

impl BattleEmote {
    pub fn new(titan: &Titan, phrase: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            titan_id: titan.id,
            owner_id: titan.owner_id.clone(),
            phrase,
            created_at: Utc::now(),
        }
    }
}
