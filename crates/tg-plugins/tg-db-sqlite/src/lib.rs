//! # tg-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `tg-core` domain models.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteQueryResult, SqliteRow};
use sqlx::Row;
use tg_core::models::{BattleEmote, Titan, UserId};
use tg_core::traits::{EmoteRepo, TitanRepo, WriteOutcome};
use uuid::Uuid;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS titans (
        id          BLOB PRIMARY KEY,
        owner_id    TEXT NOT NULL,
        name        TEXT NOT NULL,
        description TEXT,
        level       INTEGER NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS battle_emotes (
        id          BLOB PRIMARY KEY,
        titan_id    BLOB NOT NULL REFERENCES titans(id) ON DELETE CASCADE,
        owner_id    TEXT NOT NULL,
        phrase      TEXT NOT NULL,
        created_at  TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_titans_owner ON titans (owner_id)",
    // Backs the per-owner, case-insensitive name rule
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_titans_owner_name ON titans (owner_id, lower(name))",
];

pub struct SqliteGameRepo {
    pool: SqlitePool,
}

impl SqliteGameRepo {
    /// Connects (creating the file if needed) and ensures the schema exists.
    ///
    /// In-memory databases live as long as their connection, so they get a
    /// single connection that is never recycled.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        log::info!("SQLite repository ready at {database_url}");
        Ok(Self { pool })
    }
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> anyhow::Result<Uuid> {
    Ok(Uuid::from_slice(blob)?)
}

/// Maps a unique-index violation to `NameTaken`; other errors propagate.
fn name_outcome(result: Result<SqliteQueryResult, sqlx::Error>) -> anyhow::Result<WriteOutcome> {
    match result {
        Ok(_) => Ok(WriteOutcome::Written),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(WriteOutcome::NameTaken),
        Err(err) => Err(err.into()),
    }
}

fn titan_from_row(row: &SqliteRow) -> anyhow::Result<Titan> {
    Ok(Titan {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        owner_id: UserId::from(row.try_get::<String, _>("owner_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        level: row.try_get("level")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn emote_from_row(row: &SqliteRow) -> anyhow::Result<BattleEmote> {
    Ok(BattleEmote {
        id: blob_to_uuid(row.try_get::<Vec<u8>, _>("id")?.as_slice())?,
        titan_id: blob_to_uuid(row.try_get::<Vec<u8>, _>("titan_id")?.as_slice())?,
        owner_id: UserId::from(row.try_get::<String, _>("owner_id")?),
        phrase: row.try_get("phrase")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl TitanRepo for SqliteGameRepo {
    async fn get_titan(&self, id: Uuid) -> anyhow::Result<Option<Titan>> {
        let row = sqlx::query("SELECT * FROM titans WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(titan_from_row).transpose()
    }

    async fn list_titans(&self, owner: &UserId) -> anyhow::Result<Vec<Titan>> {
        sqlx::query("SELECT * FROM titans WHERE owner_id = ? ORDER BY created_at ASC, id ASC")
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(titan_from_row)
            .collect()
    }

    async fn create_titan(&self, titan: Titan) -> anyhow::Result<WriteOutcome> {
        let result = sqlx::query("INSERT INTO titans (id, owner_id, name, description, level, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(uuid_to_blob(titan.id))
            .bind(titan.owner_id.as_str())
            .bind(titan.name)
            .bind(titan.description)
            .bind(titan.level)
            .bind(titan.created_at)
            .bind(titan.updated_at)
            .execute(&self.pool)
            .await;
        name_outcome(result)
    }

    async fn update_titan(&self, titan: Titan) -> anyhow::Result<WriteOutcome> {
        let result = sqlx::query("UPDATE titans SET name = ?, description = ?, level = ?, updated_at = ? WHERE id = ?")
            .bind(titan.name)
            .bind(titan.description)
            .bind(titan.level)
            .bind(titan.updated_at)
            .bind(uuid_to_blob(titan.id))
            .execute(&self.pool)
            .await;
        name_outcome(result)
    }

    /// Removes the titan and its emotes atomically.
    ///
    /// # Developer Note
    /// The cascade is spelled out instead of relying on the foreign key
    /// pragma, which may be off for externally created databases.
    async fn delete_titan(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await?;

        // 1. Delete emotes
        sqlx::query("DELETE FROM battle_emotes WHERE titan_id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await?;

        // 2. Delete titan
        let deleted = sqlx::query("DELETE FROM titans WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl EmoteRepo for SqliteGameRepo {
    async fn get_emote(&self, id: Uuid) -> anyhow::Result<Option<BattleEmote>> {
        let row = sqlx::query("SELECT * FROM battle_emotes WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(emote_from_row).transpose()
    }

    async fn list_emotes(&self, titan_id: Uuid) -> anyhow::Result<Vec<BattleEmote>> {
        sqlx::query("SELECT * FROM battle_emotes WHERE titan_id = ? ORDER BY created_at ASC, id ASC")
            .bind(uuid_to_blob(titan_id))
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(emote_from_row)
            .collect()
    }

    /// Count and insert run as one statement. SQLite takes the write lock
    /// before the count is read, so concurrent inserts cannot overshoot.
    async fn create_emote(&self, emote: BattleEmote, limit: i64) -> anyhow::Result<WriteOutcome> {
        let inserted = sqlx::query(
            "INSERT INTO battle_emotes (id, titan_id, owner_id, phrase, created_at)
             SELECT ?, ?, ?, ?, ?
             WHERE (SELECT COUNT(*) FROM battle_emotes WHERE titan_id = ?) < ?",
        )
        .bind(uuid_to_blob(emote.id))
        .bind(uuid_to_blob(emote.titan_id))
        .bind(emote.owner_id.as_str())
        .bind(emote.phrase)
        .bind(emote.created_at)
        .bind(uuid_to_blob(emote.titan_id))
        .bind(limit)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            log::debug!("titan {} is at its emote limit of {limit}", emote.titan_id);
            return Ok(WriteOutcome::LimitReached);
        }
        Ok(WriteOutcome::Written)
    }

    async fn delete_emote(&self, id: Uuid) -> anyhow::Result<bool> {
        let deleted = sqlx::query("DELETE FROM battle_emotes WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}
