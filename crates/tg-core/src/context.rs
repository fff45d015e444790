//! # Request Context
//!
//! The per-request identity every action receives as an argument.
//! Inbound adapters build it once from the session provider.

use crate::error::{AppError, Result};
use crate::models::UserId;
use crate::traits::SessionProvider;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user: Option<UserId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    /// Resolves an optional bearer token. Unknown tokens and provider
    /// failures both yield an anonymous context.
    pub async fn from_token(sessions: &dyn SessionProvider, token: Option<&str>) -> Self {
        let Some(token) = token else {
            return Self::anonymous();
        };
        match sessions.resolve(token).await {
            Ok(Some(user)) => Self { user: Some(user) },
            Ok(None) => {
                log::debug!("rejected session token");
                Self::anonymous()
            }
            Err(err) => {
                log::warn!("session lookup failed: {err:#}");
                Self::anonymous()
            }
        }
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> Result<&UserId> {
        self.user.as_ref().ok_or(AppError::Unauthenticated)
    }
}
