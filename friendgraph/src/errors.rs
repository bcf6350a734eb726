use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by the friendgraph engines.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A user with this email address is already registered.
    #[error("a user with email '{email}' already exists")]
    DuplicateEmail { email: String },

    /// Referenced user, post, profile or friend request is absent.
    #[error("{entity} not found")]
    NotFound {
        entity: Cow<'static, str>,
        entity_id: Option<String>,
    },

    /// The actor does not own the resource it tried to change.
    #[error("user '{actor_id}' may not modify '{entity_id}'")]
    Unauthorized { actor_id: String, entity_id: String },

    /// Email and password did not match a registered user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A relation guard rejected the mutation (e.g. the pair is already linked).
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// Unique index violation reported by the store.
    #[error("unique constraint violation: {field} '{value}' already belongs to '{existing_entity_id}'")]
    UniqueConstraintViolation {
        field: String,
        value: String,
        existing_entity_id: String,
    },

    /// Password hashing or hash parsing failed.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },

    /// Image upload or removal failed.
    #[error("image store error: {0}")]
    Image(#[from] std::io::Error),

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl GraphError {
    pub fn not_found(entity: &'static str, entity_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: Cow::Borrowed(entity),
            entity_id: Some(entity_id.into()),
        }
    }

    pub fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other { message: message.into() }
    }

    /// Whether the error is something the caller should display next to a form
    /// rather than treat as a failure of the system.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::DuplicateEmail { .. }
                | Self::InvalidCredentials
                | Self::NotFound { .. }
                | Self::Unauthorized { .. }
                | Self::Conflict { .. }
        )
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Turns the collected issues into a result; empty collections pass.
    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Detailed validation failure for a single field or logical path.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub type GraphResult<T> = Result<T, GraphError>;
