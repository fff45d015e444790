//! # Action Results
//!
//! Every server action ends by packaging its outcome into an [`ActionResult`].
//! Callers branch on the variant instead of catching errors: field errors
//! first, then the general error, then the payload.
//!
//! [`ActionState`] is the flat, optional-field form of the same value. It only
//! exists at the serialization boundary (`{"fieldErrors": .., "error": .., "data": ..}`).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// Per-field validation messages, ordered by field name.
///
/// Fields with no messages are never stored, so every entry carries at
/// least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to `field`, keeping earlier messages in order.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder form of [`FieldErrors::push`].
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for FieldErrors {
    fn from(mut map: BTreeMap<String, Vec<String>>) -> Self {
        map.retain(|_, messages| !messages.is_empty());
        Self(map)
    }
}

impl<K, M> FromIterator<(K, M)> for FieldErrors
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.push(field, message);
        }
        errors
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Vec<String>>::deserialize(deserializer).map(Self::from)
    }
}

/// Outcome of a single server action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The mutation went through; carries its payload.
    Success(T),
    /// One or more input fields failed validation.
    FieldFailure(FieldErrors),
    /// Anything not attributable to a field: auth, not-found, conflict, internal.
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success(data)
    }

    pub fn field_failure(errors: impl Into<FieldErrors>) -> Self {
        Self::FieldFailure(errors.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Packages the inner result of an action.
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => err.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::FieldFailure(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ActionResult<U> {
        match self {
            Self::Success(data) => ActionResult::Success(f(data)),
            Self::FieldFailure(errors) => ActionResult::FieldFailure(errors),
            Self::Failure(message) => ActionResult::Failure(message),
        }
    }
}

impl<T> From<AppError> for ActionResult<T> {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(errors) => Self::FieldFailure(errors),
            AppError::Internal(detail) => {
                log::error!("action failed: {detail}");
                Self::Failure(AppError::INTERNAL_MESSAGE.to_string())
            }
            other => Self::Failure(other.to_string()),
        }
    }
}

/// Boundary encoding of an [`ActionResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActionStateError {
    #[error("action state carries neither errors nor data")]
    MissingData,
}

impl<T> ActionState<T> {
    /// Decodes a boundary value, checking field errors before the general
    /// error before the payload.
    pub fn into_result(self) -> Result<ActionResult<T>, ActionStateError> {
        if let Some(errors) = self.field_errors.filter(|e| !e.is_empty()) {
            return Ok(ActionResult::FieldFailure(errors));
        }
        if let Some(message) = self.error {
            return Ok(ActionResult::Failure(message));
        }
        self.data
            .map(ActionResult::Success)
            .ok_or(ActionStateError::MissingData)
    }
}

impl<T> From<ActionResult<T>> for ActionState<T> {
    fn from(result: ActionResult<T>) -> Self {
        match result {
            ActionResult::Success(data) => Self {
                field_errors: None,
                error: None,
                data: Some(data),
            },
            ActionResult::FieldFailure(errors) => Self {
                field_errors: Some(errors),
                error: None,
                data: None,
            },
            ActionResult::Failure(message) => Self {
                field_errors: None,
                error: Some(message),
                data: None,
            },
        }
    }
}

impl<T> TryFrom<ActionState<T>> for ActionResult<T> {
    type Error = ActionStateError;

    fn try_from(state: ActionState<T>) -> Result<Self, Self::Error> {
        state.into_result()
    }
}
