//! Input validation.
//!
//! Form payloads are checked in full before any domain operation runs;
//! a failed validation reports every broken field and writes nothing.

use std::fmt;

use gazette_store::{Database, StoreError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// One broken field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Everything wrong with a submitted form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Payload for creating or editing a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

/// Payload for commenting on a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub text: String,
}

/// Payload for creating a group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Validate a post payload.  The referenced group, when given, must exist.
pub fn validate_post(db: &Database, input: &PostInput) -> Result<()> {
    let mut errors = Vec::new();

    if input.text.trim().is_empty() {
        errors.push(FieldError {
            field: "text",
            message: "must not be empty".to_string(),
        });
    }

    if let Some(group_id) = input.group_id {
        match db.get_group(group_id) {
            Ok(_) => {}
            Err(StoreError::NotFound) => errors.push(FieldError {
                field: "group_id",
                message: "no such group".to_string(),
            }),
            Err(e) => return Err(DomainError::Store(e)),
        }
    }

    collect(errors)
}

/// Validate a comment payload.
pub fn validate_comment(input: &CommentInput) -> Result<()> {
    let mut errors = Vec::new();
    if input.text.trim().is_empty() {
        errors.push(FieldError {
            field: "text",
            message: "must not be empty".to_string(),
        });
    }
    collect(errors)
}

/// Validate a group payload.  Slugs are lowercase ASCII, digits and `-`.
pub fn validate_group(input: &GroupInput) -> Result<()> {
    let mut errors = Vec::new();

    if input.title.trim().is_empty() {
        errors.push(FieldError {
            field: "title",
            message: "must not be empty".to_string(),
        });
    }
    if input.description.trim().is_empty() {
        errors.push(FieldError {
            field: "description",
            message: "must not be empty".to_string(),
        });
    }

    let slug_ok = !input.slug.is_empty()
        && input
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !slug_ok {
        errors.push(FieldError {
            field: "slug",
            message: "must be non-empty lowercase letters, digits or '-'".to_string(),
        });
    }

    collect(errors)
}

fn collect(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Invalid(ValidationErrors(errors)))
    }
}
