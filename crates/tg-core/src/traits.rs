//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Actions receive them as injected handles, never through globals.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{BattleEmote, Titan, UserId};

/// Outcome of a write that storage may refuse on its own rules.
///
/// Storage enforces these atomically, so concurrent requests cannot
/// slip past a check made earlier by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The owner already has a titan with this name, ignoring case.
    NameTaken,
    /// The titan already holds the allowed number of emotes.
    LimitReached,
}

/// Persistence contract for titans.
#[async_trait]
pub trait TitanRepo: Send + Sync {
    async fn get_titan(&self, id: Uuid) -> anyhow::Result<Option<Titan>>;
    /// Titans owned by `owner`, oldest first.
    async fn list_titans(&self, owner: &UserId) -> anyhow::Result<Vec<Titan>>;
    /// Names are unique per owner, ignoring case.
    async fn create_titan(&self, titan: Titan) -> anyhow::Result<WriteOutcome>;
    /// Renaming a titan to its own name in another casing is allowed.
    async fn update_titan(&self, titan: Titan) -> anyhow::Result<WriteOutcome>;
    /// Removes the titan and its emotes. Returns false if nothing was deleted.
    async fn delete_titan(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Persistence contract for battle emotes.
#[async_trait]
pub trait EmoteRepo: Send + Sync {
    async fn get_emote(&self, id: Uuid) -> anyhow::Result<Option<BattleEmote>>;
    /// Emotes of a titan, oldest first.
    async fn list_emotes(&self, titan_id: Uuid) -> anyhow::Result<Vec<BattleEmote>>;
    /// Inserts unless the titan already holds `limit` emotes.
    async fn create_emote(&self, emote: BattleEmote, limit: i64) -> anyhow::Result<WriteOutcome>;
    async fn delete_emote(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Identity contract: turns a caller-supplied session token into a user.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `Ok(None)` means the token is unknown, expired or forged.
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<UserId>>;
}
