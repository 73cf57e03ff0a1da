/// Storage error classification
///
/// Postgres reports constraint violations with the constraint's name. Each
/// entity kind owns a fixed table from constraint name to [`Classification`];
/// the lookup itself is shared. Anything not in the table is unclassified:
/// it is logged with full detail and reduced to [`DomainError::Storage`].
///
/// Constraint names are defined by the migrations in `migrations/`.

use std::fmt;

use tracing::error;

use crate::error::DomainError;

/// Entity kind an operation works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Chore,
    User,
    Task,
    Session,
    Report,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Chore => "chore",
            Entity::User => "user",
            Entity::Task => "task",
            Entity::Session => "session",
            Entity::Report => "report",
        }
    }

    /// Constraint name → classification for this entity kind
    fn constraints(&self) -> &'static [(&'static str, Classification)] {
        match self {
            Entity::Chore => &[
                ("chores_name_key", Classification::DuplicateName),
                ("chores_name_check", Classification::InvalidName),
                ("tasks_chore_id_fkey", Classification::StillInUse),
            ],
            Entity::User => &[
                ("users_name_key", Classification::DuplicateName),
                ("users_name_check", Classification::InvalidName),
                ("tasks_user_id_fkey", Classification::StillInUse),
            ],
            // On a task the foreign keys fail on insert/update, when the
            // referenced chore or user is gone.
            Entity::Task => &[
                ("tasks_chore_id_fkey", Classification::MissingReference),
                ("tasks_user_id_fkey", Classification::MissingReference),
            ],
            Entity::Session => &[("user_sessions_user_id_fkey", Classification::MissingReference)],
            Entity::Report => &[],
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway operation, for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
    Lookup,
    Touch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Lookup => "lookup",
            Operation::Touch => "touch",
        })
    }
}

/// What a constraint violation means for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    DuplicateName,
    InvalidName,
    StillInUse,
    MissingReference,
    Unclassified,
}

/// Looks a constraint name up in the entity's table
pub fn classify_constraint(entity: Entity, constraint: Option<&str>) -> Classification {
    let Some(constraint) = constraint else {
        return Classification::Unclassified;
    };

    entity
        .constraints()
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, classification)| *classification)
        .unwrap_or(Classification::Unclassified)
}

/// Converts a driver error into a domain error
///
/// Unclassified errors are logged at error level with the entity, the
/// operation and the full driver error before being reduced.
pub fn classify(entity: Entity, operation: Operation, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::RowNotFound = err {
        return DomainError::NotFound;
    }

    let constraint = match &err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    };

    match classify_constraint(entity, constraint) {
        Classification::DuplicateName => DomainError::DuplicateName,
        Classification::InvalidName => DomainError::InvalidName,
        Classification::StillInUse => DomainError::StillInUse,
        Classification::MissingReference => DomainError::NotFound,
        Classification::Unclassified => {
            error!(
                entity = %entity,
                operation = %operation,
                constraint = constraint.unwrap_or(""),
                error = %err,
                "Unclassified storage error"
            );
            DomainError::Storage
        }
    }
}
