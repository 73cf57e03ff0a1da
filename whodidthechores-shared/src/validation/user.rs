use tracing::debug;

use super::{required, UserForm};
use crate::error::{DomainResult, FieldError, ValidationErrors};
use crate::models::UserParams;
use crate::repository::Repository;

impl Repository {
    /// Validates a user form; `exclude_id` is the user being renamed
    pub async fn validate_user(
        &self,
        form: &UserForm,
        exclude_id: Option<i32>,
    ) -> DomainResult<UserParams> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", required(&form.name));
        if let Some(name) = &name {
            if self.user_name_taken(name, exclude_id).await? {
                errors.add("name", FieldError::Duplicate);
            }
        }

        match name {
            Some(name) if errors.is_empty() => Ok(UserParams { name }),
            _ => {
                debug!(%errors, "User form rejected");
                Err(errors.into())
            }
        }
    }
}
