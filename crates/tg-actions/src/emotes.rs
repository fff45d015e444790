//! Battle emote server actions.

use serde::Deserialize;
use tg_core::{ActionResult, AppError, BattleEmote, RequestContext, Result, WriteOutcome};
use uuid::Uuid;

use crate::validation;
use crate::Actions;

pub const MAX_EMOTES_PER_TITAN: i64 = 8;
pub const TOO_MANY_EMOTES: &str = "A titan can have at most 8 battle emotes";
pub const NOT_OWNER: &str = "You do not own this battle emote";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBattleEmoteInput {
    #[serde(default)]
    pub phrase: String,
}

impl Actions {
    pub async fn create_battle_emote(
        &self,
        ctx: &RequestContext,
        titan_id: Uuid,
        input: CreateBattleEmoteInput,
    ) -> ActionResult<BattleEmote> {
        ActionResult::from_result(self.try_create_battle_emote(ctx, titan_id, input).await)
    }

    pub async fn delete_battle_emote(&self, ctx: &RequestContext, id: Uuid) -> ActionResult<Uuid> {
        ActionResult::from_result(self.try_delete_battle_emote(ctx, id).await)
    }

    pub async fn list_battle_emotes(
        &self,
        ctx: &RequestContext,
        titan_id: Uuid,
    ) -> ActionResult<Vec<BattleEmote>> {
        ActionResult::from_result(self.try_list_battle_emotes(ctx, titan_id).await)
    }

    async fn try_create_battle_emote(
        &self,
        ctx: &RequestContext,
        titan_id: Uuid,
        input: CreateBattleEmoteInput,
    ) -> Result<BattleEmote> {
        let owner = ctx.require_user()?;
        let phrase = validation::emote_phrase(&input.phrase)?;
        let titan = self.owned_titan(owner, titan_id).await?;

        // The cap is checked by storage in the same write as the insert
        let emote = BattleEmote::new(&titan, phrase);
        let outcome = self
            .emotes
            .create_emote(emote.clone(), MAX_EMOTES_PER_TITAN)
            .await?;
        if outcome != WriteOutcome::Written {
            return Err(AppError::conflict(TOO_MANY_EMOTES));
        }

        log::info!("user {owner} added emote {} to titan {}", emote.id, titan.id);
        Ok(emote)
    }

    async fn try_delete_battle_emote(&self, ctx: &RequestContext, id: Uuid) -> Result<Uuid> {
        let owner = ctx.require_user()?;
        let emote = self
            .emotes
            .get_emote(id)
            .await?
            .ok_or_else(|| AppError::not_found("Battle emote"))?;
        if &emote.owner_id != owner {
            return Err(AppError::forbidden(NOT_OWNER));
        }

        if !self.emotes.delete_emote(id).await? {
            return Err(AppError::not_found("Battle emote"));
        }

        log::info!("user {owner} deleted emote {id}");
        Ok(id)
    }

    async fn try_list_battle_emotes(
        &self,
        ctx: &RequestContext,
        titan_id: Uuid,
    ) -> Result<Vec<BattleEmote>> {
        let owner = ctx.require_user()?;
        let titan = self.owned_titan(owner, titan_id).await?;
        Ok(self.emotes.list_emotes(titan.id).await?)
    }
}
