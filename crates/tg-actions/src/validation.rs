//! Input rules shared by the titan and battle emote actions.
//!
//! Each check collects every failing field before returning, so the caller
//! can show all messages at once.

use tg_core::{AppError, FieldErrors};

pub const NAME_MAX_CHARS: usize = 32;
pub const DESCRIPTION_MAX_CHARS: usize = 280;
pub const PHRASE_MAX_CHARS: usize = 140;

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_TOO_LONG: &str = "Name must be at most 32 characters";
pub const NAME_BAD_CHARS: &str =
    "Name may only contain letters, numbers, spaces, hyphens and apostrophes";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be at most 280 characters";
pub const PHRASE_REQUIRED: &str = "Phrase is required";
pub const PHRASE_TOO_LONG: &str = "Phrase must be at most 140 characters";

/// Titan fields after trimming and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitanFields {
    pub name: String,
    pub description: Option<String>,
}

pub fn titan_fields(name: &str, description: Option<&str>) -> Result<TitanFields, AppError> {
    let mut errors = FieldErrors::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push("name", NAME_REQUIRED);
    } else {
        if name.chars().count() > NAME_MAX_CHARS {
            errors.push("name", NAME_TOO_LONG);
        }
        if !name.chars().all(is_name_char) {
            errors.push("name", NAME_BAD_CHARS);
        }
    }

    let description = description.map(str::trim).filter(|d| !d.is_empty());
    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS) {
        errors.push("description", DESCRIPTION_TOO_LONG);
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(TitanFields {
        name: name.to_string(),
        description: description.map(str::to_string),
    })
}

pub fn emote_phrase(phrase: &str) -> Result<String, AppError> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return Err(AppError::validation("phrase", PHRASE_REQUIRED));
    }
    if phrase.chars().count() > PHRASE_MAX_CHARS {
        return Err(AppError::validation("phrase", PHRASE_TOO_LONG));
    }
    Ok(phrase.to_string())
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '-' || c == '\''
}
