/// Session cookie
///
/// The browser holds the session id in a cookie named `session`:
/// `HttpOnly`, `Secure`, `SameSite=Strict`, path `/`, expiring with the
/// session. Logout answers with the same cookie already expired.

use cookie::time::OffsetDateTime;
use cookie::{Cookie, SameSite};
use uuid::Uuid;

use crate::models::Session;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Cookie carrying `session` to the browser
pub fn session_cookie(session: &Session) -> Cookie<'static> {
    let expires = OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);

    base_cookie(session.id.to_string())
        .expires(expires)
        .build()
}

/// Cookie that makes the browser drop the session id
pub fn expired_session_cookie() -> Cookie<'static> {
    base_cookie(String::new())
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(cookie::time::Duration::ZERO)
        .build()
}

/// Session id from a `Cookie` request header, if it carries a well-formed one
pub fn session_id_from_cookie_header(header: &str) -> Option<Uuid> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn base_cookie(value: String) -> cookie::CookieBuilder<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
}
