/// Authentication
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and the password strength estimate
/// - [`session`]: signup, login, logout and session resolution
/// - [`cookie`]: the `session` cookie handed to browsers
///
/// # Example
///
/// ```no_run
/// use whodidthechores_shared::auth::cookie::session_cookie;
/// use whodidthechores_shared::auth::session::SessionManager;
/// use whodidthechores_shared::Repository;
///
/// # async fn example(repo: Repository) -> Result<(), Box<dyn std::error::Error>> {
/// let sessions = SessionManager::new(repo);
///
/// let signed_in = sessions.login("alice", "correct-Horse-battery-9").await?;
/// let cookie = session_cookie(&signed_in.session);
///
/// let again = sessions.get_session(signed_in.session.id).await?;
/// assert_eq!(again.user.name, "alice");
///
/// sessions.logout(signed_in.session.id).await?;
/// # Ok(())
/// # }
/// ```

pub mod cookie;
pub mod password;
pub mod session;

pub use session::SessionManager;
