//! Identity extractor and quiz-session cookie handling.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

use crate::session::generate_session_id;

pub const SESSION_COOKIE_NAME: &str = "wt_session";

/// Opaque user id set by the external sign-in service.
pub const USER_COOKIE_NAME: &str = "wt_user";

/// Who is making the request. Only distinguishes identified from anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(String),
}

impl Identity {
    /// Blank ids count as anonymous.
    pub fn from_user_id(user_id: Option<&str>) -> Self {
        match user_id.map(str::trim) {
            Some(id) if !id.is_empty() => Identity::User(id.to_string()),
            _ => Identity::Anonymous,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User(id) => Some(id),
        }
    }

    pub fn is_identified(&self) -> bool {
        matches!(self, Identity::User(_))
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state).await?;
        Ok(Identity::from_user_id(
            jar.get(USER_COOKIE_NAME).map(|c| c.value()),
        ))
    }
}

/// Return the quiz session id from the cookie jar, issuing a new session
/// cookie when the request has none.
pub fn ensure_session(jar: CookieJar, expiry_hours: i64) -> (CookieJar, String) {
    let existing = jar
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|id| !id.is_empty());
    if let Some(session_id) = existing {
        return (jar, session_id);
    }

    let session_id = generate_session_id();
    tracing::debug!("Starting quiz session {}", session_id);
    let cookie = Cookie::build((SESSION_COOKIE_NAME, session_id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(expiry_hours))
        .build();
    (jar.add(cookie), session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_user_id() {
        assert_eq!(Identity::from_user_id(None), Identity::Anonymous);
        assert_eq!(Identity::from_user_id(Some("  ")), Identity::Anonymous);
        assert_eq!(
            Identity::from_user_id(Some("a1b2")),
            Identity::User("a1b2".to_string())
        );
        assert!(Identity::from_user_id(Some("a1b2")).is_identified());
    }

    #[test]
    fn test_ensure_session_reuses_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, "abc"));
        let (_, id) = ensure_session(jar, 1);
        assert_eq!(id, "abc");
    }

    #[test]
    fn test_ensure_session_issues_cookie() {
        let (jar, id) = ensure_session(CookieJar::new(), 1);
        assert_eq!(id.len(), 32);
        assert_eq!(jar.get(SESSION_COOKIE_NAME).map(|c| c.value()), Some(id.as_str()));
    }
}
