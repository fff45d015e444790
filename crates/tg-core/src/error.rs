//! # AppError
//!
//! Centralized error handling for Titan Grimoire actions.
//! The `Display` text of each variant is the message shown to the player,
//! except for `Internal`, whose detail is only ever logged.

use thiserror::Error;

use crate::action::FieldErrors;

/// The primary error type for all tg-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more input fields failed validation
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// No session, or the session could not be resolved
    #[error("Not authenticated")]
    Unauthenticated,

    /// Signed in, but acting on someone else's record
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found (e.g., "Titan", "Battle emote")
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists or a limit was reached
    #[error("{0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down, pool exhausted)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// What the player sees instead of an internal failure's detail.
    pub const INTERNAL_MESSAGE: &'static str = "Something went wrong";

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::new().with(field, message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for Titan Grimoire logic.
pub type Result<T> = std::result::Result<T, AppError>;
