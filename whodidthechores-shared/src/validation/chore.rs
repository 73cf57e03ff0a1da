use tracing::debug;

use super::{parse_minutes, required, ChoreForm};
use crate::error::{DomainResult, FieldError, ValidationErrors};
use crate::models::ChoreParams;
use crate::repository::Repository;

impl Repository {
    /// Validates a chore form
    ///
    /// `exclude_id` is the chore being edited, so it does not collide with
    /// its own name.
    pub async fn validate_chore(
        &self,
        form: &ChoreForm,
        exclude_id: Option<i32>,
    ) -> DomainResult<ChoreParams> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", required(&form.name));
        let description = errors.check("description", required(&form.description));
        let default_duration_mn =
            errors.check("default_duration_mn", parse_minutes(&form.default_duration_mn));

        if let Some(name) = &name {
            if self.chore_name_taken(name, exclude_id).await? {
                errors.add("name", FieldError::Duplicate);
            }
        }

        match (name, description, default_duration_mn) {
            (Some(name), Some(description), Some(default_duration_mn)) if errors.is_empty() => {
                Ok(ChoreParams {
                    name,
                    description,
                    default_duration_mn,
                })
            }
            _ => {
                debug!(%errors, "Chore form rejected");
                Err(errors.into())
            }
        }
    }
}
