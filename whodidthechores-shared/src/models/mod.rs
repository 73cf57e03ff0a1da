/// Database models
///
/// Each model owns its row type, its input types and the SQL that reads and
/// writes it. Queries take a `&mut PgConnection` so the repository can run
/// them inside a transaction.
///
/// - `chore`: recurring task definitions
/// - `user`: people, with their login credentials
/// - `task`: one performance of a chore by a user
/// - `session`: authentication grants

pub mod chore;
pub mod session;
pub mod task;
pub mod user;

pub use chore::{Chore, ChoreParams};
pub use session::{AuthenticatedSession, NewSession, Session};
pub use task::{Task, TaskDetails, TaskParams};
pub use user::{NewUser, User, UserParams};
