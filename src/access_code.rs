//! Resolving access codes to users and generating new codes.
//!
//! An access code is the only thing that separates one user's records from
//! another's. Submitting a code either logs in the user that owns it or starts
//! the sign up flow for a new user with that code.

use rand::Rng;
use rusqlite::Connection;

use crate::{
    Error,
    user::{DisplayName, User, UserCode, create_user, get_user_by_code},
};

/// What should happen after a user submits an access code.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessCodeOutcome {
    /// The code belongs to an existing user.
    LogIn(User),
    /// Nobody owns the code yet, ask for a display name before creating the user.
    NeedsDisplayName(UserCode),
}

/// What happened when trying to claim an access code for a new user.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    Created(User),
    /// Someone else claimed the code after it was looked up.
    CodeTaken(UserCode),
}

/// Look up the owner of `user_code`.
///
/// No user is created here, an unknown code moves the flow to the display name step.
///
/// # Errors
/// Returns an [Error::SqlError] if the user table could not be queried.
pub fn resolve_access_code(
    user_code: UserCode,
    connection: &Connection,
) -> Result<AccessCodeOutcome, Error> {
    match get_user_by_code(&user_code, connection)? {
        Some(user) => Ok(AccessCodeOutcome::LogIn(user)),
        None => Ok(AccessCodeOutcome::NeedsDisplayName(user_code)),
    }
}

/// Create a user that logs in with `user_code`.
///
/// Losing the race for a code is a normal outcome, not an error.
///
/// # Errors
/// Returns an [Error::SqlError] for any other SQL error.
pub fn register_access_code(
    display_name: DisplayName,
    user_code: UserCode,
    connection: &Connection,
) -> Result<RegistrationOutcome, Error> {
    match create_user(display_name, user_code.clone(), connection) {
        Ok(user) => Ok(RegistrationOutcome::Created(user)),
        Err(Error::DuplicateUserCode) => Ok(RegistrationOutcome::CodeTaken(user_code)),
        Err(error) => Err(error),
    }
}

/// Generate a new access code from two random base-36 fragments.
///
/// Uniqueness is not checked, the database rejects a duplicate when the
/// user is created.
pub fn generate_access_code(rng: &mut impl Rng) -> UserCode {
    let mut code = to_base36(rng.random::<u64>());
    code.push_str(&to_base36(rng.random::<u64>()));

    UserCode::new_unchecked(&code)
}

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::with_capacity(13);

    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }

    digits.iter().rev().map(|&digit| digit as char).collect()
}
