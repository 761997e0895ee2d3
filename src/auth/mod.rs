//! Session cookies and the middleware that guards the pages of logged in users.

mod cookie;
mod middleware;
mod session;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, get_session_from_cookies, invalidate_session_cookie,
    set_session_cookie,
};
pub use middleware::{auth_guard, auth_guard_hx};
pub use session::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub use middleware::AuthState;
