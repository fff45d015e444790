//! Titan server actions: create, update, delete, list.

use chrono::Utc;
use serde::Deserialize;
use tg_core::{ActionResult, AppError, RequestContext, Result, Titan, WriteOutcome};
use uuid::Uuid;

use crate::validation;
use crate::Actions;

pub const NOT_OWNER: &str = "You do not own this titan";
pub const DUPLICATE_NAME: &str = "A titan with that name already exists";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTitanInput {
    /// Missing names are reported as a field error, not a decode error
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replacement of the editable titan fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitanInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Actions {
    pub async fn create_titan(
        &self,
        ctx: &RequestContext,
        input: CreateTitanInput,
    ) -> ActionResult<Titan> {
        ActionResult::from_result(self.try_create_titan(ctx, input).await)
    }

    pub async fn update_titan(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateTitanInput,
    ) -> ActionResult<Titan> {
        ActionResult::from_result(self.try_update_titan(ctx, id, input).await)
    }

    /// Deletes a titan along with its battle emotes. Yields the deleted id.
    pub async fn delete_titan(&self, ctx: &RequestContext, id: Uuid) -> ActionResult<Uuid> {
        ActionResult::from_result(self.try_delete_titan(ctx, id).await)
    }

    pub async fn list_titans(&self, ctx: &RequestContext) -> ActionResult<Vec<Titan>> {
        ActionResult::from_result(self.try_list_titans(ctx).await)
    }

    async fn try_create_titan(&self, ctx: &RequestContext, input: CreateTitanInput) -> Result<Titan> {
        // 1. Security Check: who is asking?
        let owner = ctx.require_user()?;

        // 2. Validation
        let fields = validation::titan_fields(&input.name, input.description.as_deref())?;

        // 3. Persistence; storage owns the per-owner uniqueness rule
        let titan = Titan::new(owner.clone(), fields.name, fields.description);
        if self.titans.create_titan(titan.clone()).await? != WriteOutcome::Written {
            return Err(AppError::conflict(DUPLICATE_NAME));
        }

        log::info!("user {owner} created titan {} ({})", titan.id, titan.name);
        Ok(titan)
    }

    async fn try_update_titan(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateTitanInput,
    ) -> Result<Titan> {
        let owner = ctx.require_user()?;
        let fields = validation::titan_fields(&input.name, input.description.as_deref())?;
        let mut titan = self.owned_titan(owner, id).await?;

        titan.name = fields.name;
        titan.description = fields.description;
        titan.updated_at = Utc::now();
        if self.titans.update_titan(titan.clone()).await? != WriteOutcome::Written {
            return Err(AppError::conflict(DUPLICATE_NAME));
        }

        log::info!("user {owner} updated titan {id}");
        Ok(titan)
    }

    async fn try_delete_titan(&self, ctx: &RequestContext, id: Uuid) -> Result<Uuid> {
        let owner = ctx.require_user()?;
        self.owned_titan(owner, id).await?;

        if !self.titans.delete_titan(id).await? {
            // Lost a race with another delete
            return Err(AppError::not_found("Titan"));
        }

        log::info!("user {owner} deleted titan {id}");
        Ok(id)
    }

    async fn try_list_titans(&self, ctx: &RequestContext) -> Result<Vec<Titan>> {
        let owner = ctx.require_user()?;
        Ok(self.titans.list_titans(owner).await?)
    }
}
