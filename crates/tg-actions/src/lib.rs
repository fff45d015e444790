//! # tg-actions
//!
//! Server actions for titans and battle emotes.
//!
//! Every public action takes the caller's [`tg_core::RequestContext`] explicitly and
//! returns exactly one [`tg_core::ActionResult`]. The work happens in a
//! private `try_*` twin returning `tg_core::Result`, and the public method
//! packages it. Nothing escapes as an error.

pub mod emotes;
pub mod titans;
pub mod validation;

use std::sync::Arc;

use tg_core::{AppError, EmoteRepo, Titan, TitanRepo, UserId};
use uuid::Uuid;

pub use emotes::CreateBattleEmoteInput;
pub use titans::{CreateTitanInput, UpdateTitanInput};

/// Entry point for all mutations. Holds the injected persistence handles.
#[derive(Clone)]
pub struct Actions {
    titans: Arc<dyn TitanRepo>,
    emotes: Arc<dyn EmoteRepo>,
}

impl Actions {
    pub fn new(titans: Arc<dyn TitanRepo>, emotes: Arc<dyn EmoteRepo>) -> Self {
        Self { titans, emotes }
    }

    /// Loads a titan and checks that the caller owns it.
    async fn owned_titan(&self, owner: &UserId, id: Uuid) -> tg_core::Result<Titan> {
        let titan = self
            .titans
            .get_titan(id)
            .await?
            .ok_or_else(|| AppError::not_found("Titan"))?;
        if !titan.is_owned_by(owner) {
            log::warn!("user {owner} tried to act on titan {id} they do not own");
            return Err(AppError::forbidden(titans::NOT_OWNER));
        }
        Ok(titan)
    }
}
