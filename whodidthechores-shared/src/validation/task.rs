use chrono::TimeZone;
use tracing::debug;

use super::{parse_minutes, parse_reference, parse_started_at, TaskForm};
use crate::error::{DomainResult, FieldError, ValidationErrors};
use crate::models::TaskParams;
use crate::repository::Repository;

impl Repository {
    /// Validates a task form
    ///
    /// `started_at` is read as wall-clock time in `tz`. Unknown chore or user
    /// ids are field errors; a storage failure during the lookups is not.
    pub async fn validate_task<Tz: TimeZone>(
        &self,
        form: &TaskForm,
        tz: &Tz,
    ) -> DomainResult<TaskParams> {
        let mut errors = ValidationErrors::new();

        let chore_id = errors.check("chore_id", parse_reference(&form.chore_id));
        let user_id = errors.check("user_id", parse_reference(&form.user_id));
        let started_at = errors.check("started_at", parse_started_at(&form.started_at, tz));
        let duration_mn = errors.check("duration_mn", parse_minutes(&form.duration_mn));
        let description = form.description.trim().to_string();

        if let Some(id) = chore_id {
            if self.get_chore(id).await?.is_none() {
                errors.add("chore_id", FieldError::NotFound);
            }
        }
        if let Some(id) = user_id {
            if self.get_user(id).await?.is_none() {
                errors.add("user_id", FieldError::NotFound);
            }
        }

        match (chore_id, user_id, started_at, duration_mn) {
            (Some(chore_id), Some(user_id), Some(started_at), Some(duration_mn))
                if errors.is_empty() =>
            {
                Ok(TaskParams {
                    user_id,
                    chore_id,
                    started_at,
                    duration_mn,
                    description,
                })
            }
            _ => {
                debug!(%errors, "Task form rejected");
                Err(errors.into())
            }
        }
    }
}
