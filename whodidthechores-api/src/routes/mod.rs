/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Session endpoints (signup, login, logout, current session)

pub mod auth;
pub mod health;
