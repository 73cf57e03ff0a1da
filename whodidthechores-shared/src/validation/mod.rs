/// Form validation
///
/// Turns raw, untyped form fields into the typed parameters the repository
/// accepts. A pass never stops at the first bad field: every field is
/// checked and every failure is recorded in one [`ValidationErrors`], which
/// the caller receives as the single [`crate::DomainError::Validation`].
///
/// The pure field parsers live here. The per-entity passes in `chore`,
/// `user` and `task` add the read-only lookups (name uniqueness, reference
/// existence) and are methods on [`crate::Repository`].
///
/// # Example
///
/// ```
/// use whodidthechores_shared::validation::{parse_minutes, required};
/// use whodidthechores_shared::FieldError;
///
/// assert_eq!(required("  Dishes "), Ok("Dishes".to_string()));
/// assert_eq!(parse_minutes("-5"), Err(FieldError::TooSmall));
/// ```

mod chore;
mod task;
mod user;

use std::num::IntErrorKind;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::FieldError;

/// Layout of task start times, minute precision, no zone
pub const STARTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Raw chore form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoreForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_duration_mn: String,
}

/// Raw user form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
}

/// Raw task form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub chore_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub duration_mn: String,
    #[serde(default)]
    pub description: String,
}

/// Trims `value`, rejecting what is left if it is empty
pub fn required(value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    Ok(trimmed.to_string())
}

/// Parses a duration in minutes within `[0, i32::MAX]`
pub fn parse_minutes(value: &str) -> Result<i32, FieldError> {
    let minutes: i64 = value.trim().parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => FieldError::TooBig,
        IntErrorKind::NegOverflow => FieldError::TooSmall,
        _ => FieldError::NotANumber,
    })?;

    if minutes < 0 {
        return Err(FieldError::TooSmall);
    }
    i32::try_from(minutes).map_err(|_| FieldError::TooBig)
}

/// Parses an entity id from a form select
///
/// Anything that is not an integer is [`FieldError::InvalidReference`]. An
/// integer no row could carry (negative or wider than 32 bits) is
/// [`FieldError::NotFound`] without asking the database.
pub fn parse_reference(value: &str) -> Result<i32, FieldError> {
    let id: i64 = value.trim().parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => FieldError::NotFound,
        _ => FieldError::InvalidReference,
    })?;

    if id < 0 {
        return Err(FieldError::NotFound);
    }
    i32::try_from(id).map_err(|_| FieldError::NotFound)
}

/// Parses a `YYYY-MM-DDThh:mm` wall-clock time in `tz`
///
/// An ambiguous local time (DST fold) resolves to its earlier instant. A
/// time that does not exist in `tz` (DST gap) is rejected.
pub fn parse_started_at<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Utc>, FieldError> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), STARTED_AT_FORMAT)
        .map_err(|_| FieldError::InvalidDate)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or(FieldError::InvalidDate)
}
