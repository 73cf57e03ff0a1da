/// Domain error taxonomy
///
/// Every gateway, validator and session operation returns [`DomainResult`].
/// Callers branch on the variant; only [`DomainError::Validation`] carries
/// per-field detail. Storage failures are logged where they happen and reach
/// the caller as the opaque [`DomainError::Storage`].
///
/// # Example
///
/// ```
/// use whodidthechores_shared::error::{DomainError, FieldError, ValidationErrors};
///
/// let mut errors = ValidationErrors::new();
/// errors.add("name", FieldError::Required);
///
/// let err = DomainError::Validation(errors);
/// assert!(err.is_validation());
/// ```

use std::collections::BTreeMap;
use std::fmt;

use crate::auth::password::PasswordError;

/// Result alias used across the library
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by the domain layer
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// One or more fields failed validation. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A live entity of the same kind already uses this name
    #[error("name already taken")]
    DuplicateName,

    /// The storage engine rejected the name (empty)
    #[error("invalid name")]
    InvalidName,

    /// The entity is still referenced by at least one task
    #[error("still referenced by existing tasks")]
    StillInUse,

    /// The entity, or an entity it references, does not exist
    #[error("not found")]
    NotFound,

    /// Unclassified storage failure; detail was logged server-side
    #[error("storage error")]
    Storage,

    /// Bad credentials, or a missing or expired session
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Password hashing or verification could not run
    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

impl DomainError {
    /// True for the single "validation failed" signal
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }

    /// Field errors, when this is a validation failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("can't be empty")]
    Required,

    #[error("already taken, please choose another one")]
    Duplicate,

    #[error("please enter a number")]
    NotANumber,

    #[error("can't be negative")]
    TooSmall,

    #[error("too big, please select a smaller number")]
    TooBig,

    #[error("not found")]
    NotFound,

    #[error("please select an existing entry")]
    InvalidReference,

    #[error("please enter a valid date")]
    InvalidDate,

    #[error("password is too easy to guess")]
    WeakPassword,
}

/// Field name → error, accumulated over a whole validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`. The first error recorded for a field wins.
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.fields.entry(field).or_insert(error);
    }

    /// Unwraps a field result, recording the error if there is one
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(field, error);
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.fields.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> + '_ {
        self.fields.iter().map(|(field, error)| (*field, *error))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}
