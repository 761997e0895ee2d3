//! Defines functions for keeping the session of the logged in user in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Session, user::User};

pub(crate) const COOKIE_SESSION: &str = "session";

/// The default duration for which session cookies are valid after the last request.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(7);

/// Add a session cookie for `user` to the cookie jar, indicating that the user is logged in.
///
/// The session expires `duration` from the current time.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidDateFormat] if the expiry date-time overflows.
/// - [Error::JSONSerializationError] if the session could not be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    user: &User,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDateFormat(format!("now + {duration} overflowed")))?;

    let session = Session {
        user: user.clone(),
        expires_at,
    };

    set_session(jar, &session)
}

fn set_session(jar: PrivateCookieJar, session: &Session) -> Result<PrivateCookieJar, Error> {
    let session_json = serde_json::to_string(session)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, session_json))
            .expires(session.expires_at)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session from the session cookie in `jar`.
///
/// # Errors
///
/// Returns an:
/// - [Error::CookieMissing] if there is no session cookie.
/// - [Error::InvalidSessionCookie] if the cookie does not hold a session or
///   the session has expired.
pub fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;

    let session: Session = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidSessionCookie(error.to_string()))?;

    if session.expires_at < OffsetDateTime::now_utc() {
        return Err(Error::InvalidSessionCookie(format!(
            "session expired at {}",
            session.expires_at
        )));
    }

    Ok(session)
}

/// Set the expiry of the session in `jar` to the latest of UTC now plus
/// `duration` and the session's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] or [Error::InvalidSessionCookie] if there is no valid session.
/// - [Error::InvalidDateFormat] if extending the session by `duration` would overflow.
/// - [Error::JSONSerializationError] if the session could not be serialized.
pub(crate) fn extend_session_cookie_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let mut session = get_session_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDateFormat(format!("now + {duration} overflowed")))?;

    if new_expiry <= session.expires_at {
        return Ok(jar);
    }

    session.expires_at = new_expiry;

    set_session(jar, &session)
}
