// ABOUTME: Field-level validation of episode, part, and position requests
// ABOUTME: Rules that need the database (title uniqueness, id existence) live in the service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Episode fields as submitted by a client. Every field is optional at the
/// wire level so that a missing field becomes a validation message instead
/// of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Part fields submitted when adding a part to an episode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartInput {
    pub position: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of a reposition request: which part, and where to
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionInput {
    pub id: Option<i64>,
    pub position: Option<i64>,
}

/// Validates episode data for creation or update
pub fn validate_episode_input(input: &EpisodeInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_title(input.title.as_deref(), &mut errors);

    if let Some(ref description) = input.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(ValidationError::new(
                "description",
                format!(
                    "The description may not be greater than {} characters.",
                    MAX_DESCRIPTION_LENGTH
                ),
            ));
        }
    }

    errors
}

/// Validates a new part. Description is required for parts.
pub fn validate_part_input(input: &PartInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_position(input.position, &mut errors);
    validate_title(input.title.as_deref(), &mut errors);

    match input.description.as_deref() {
        None => errors.push(ValidationError::new(
            "description",
            "The description field is required.",
        )),
        Some(d) if d.trim().is_empty() => errors.push(ValidationError::new(
            "description",
            "The description field is required.",
        )),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => {
            errors.push(ValidationError::new(
                "description",
                format!(
                    "The description may not be greater than {} characters.",
                    MAX_DESCRIPTION_LENGTH
                ),
            ))
        }
        Some(_) => {}
    }

    errors
}

/// Validates a reposition request
pub fn validate_position_input(input: &PositionInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.id.is_none() {
        errors.push(ValidationError::new("id", "The id field is required."));
    }
    validate_position(input.position, &mut errors);

    errors
}

fn validate_title(title: Option<&str>, errors: &mut Vec<ValidationError>) {
    match title {
        None => errors.push(ValidationError::new("title", "The title field is required.")),
        Some(t) if t.trim().is_empty() => {
            errors.push(ValidationError::new("title", "The title field is required."))
        }
        Some(t) if t.chars().count() > MAX_TITLE_LENGTH => errors.push(ValidationError::new(
            "title",
            format!(
                "The title may not be greater than {} characters.",
                MAX_TITLE_LENGTH
            ),
        )),
        Some(_) => {}
    }
}

fn validate_position(position: Option<i64>, errors: &mut Vec<ValidationError>) {
    match position {
        None => errors.push(ValidationError::new(
            "position",
            "The position field is required.",
        )),
        Some(p) if p < 0 => errors.push(ValidationError::new(
            "position",
            "The position must be at least 0.",
        )),
        Some(_) => {}
    }
}

/// Groups validation errors by field, preserving message order per field
pub fn group_by_field(errors: &[ValidationError]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for error in errors {
        grouped
            .entry(error.field.clone())
            .or_default()
            .push(error.message.clone());
    }
    grouped
}

/// Truncates a string to a maximum length with ellipsis
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
