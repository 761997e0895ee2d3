//! Code for creating the user table and looking up users by their access code.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from transaction IDs, leading to better
/// compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The private access code a user logs in with.
///
/// Codes are compared exactly, after trimming surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserCode(String);

impl UserCode {
    /// Create an access code from user input.
    ///
    /// # Errors
    /// Returns [Error::EmptyUserCode] if `code` is empty or only whitespace.
    pub fn new(code: &str) -> Result<Self, Error> {
        let code = code.trim();

        if code.is_empty() {
            Err(Error::EmptyUserCode)
        } else {
            Ok(Self(code.to_owned()))
        }
    }

    /// Create an access code without trimming or checking for emptiness.
    pub fn new_unchecked(code: &str) -> Self {
        Self(code.to_owned())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The name shown in the dashboard greeting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a display name from user input.
    ///
    /// # Errors
    /// Returns [Error::EmptyDisplayName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyDisplayName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a display name without trimming or checking for emptiness.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user chose when signing up.
    pub display_name: DisplayName,
    /// The access code the user logs in with.
    pub user_code: UserCode,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                display_name TEXT NOT NULL,
                user_code TEXT NOT NULL UNIQUE
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUserCode] if another user already has `user_code`,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    display_name: DisplayName,
    user_code: UserCode,
    connection: &Connection,
) -> Result<User, Error> {
    let user = connection
        .prepare(
            "INSERT INTO user (display_name, user_code) VALUES (?1, ?2)
             RETURNING id, display_name, user_code",
        )?
        .query_row((display_name.as_str(), user_code.as_str()), map_user_row)?;

    Ok(user)
}

/// Get the user whose access code is exactly `user_code`.
///
/// An unknown code is not an error, it returns `Ok(None)`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if there was an error trying to access the store.
pub fn get_user_by_code(
    user_code: &UserCode,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    let user = connection
        .prepare("SELECT id, display_name, user_code FROM user WHERE user_code = :user_code")?
        .query_row(&[(":user_code", user_code.as_str())], map_user_row)
        .optional()?;

    Ok(user)
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let display_name: String = row.get(1)?;
    let user_code: String = row.get(2)?;

    Ok(User {
        id: UserId::new(id),
        display_name: DisplayName::new_unchecked(&display_name),
        user_code: UserCode::new_unchecked(&user_code),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        user::{DisplayName, UserCode, create_user, create_user_table, get_user_by_code},
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn user_code_is_trimmed() {
        let code = UserCode::new("  abc123 \n").unwrap();

        assert_eq!(code.as_str(), "abc123");
    }

    #[test]
    fn blank_user_code_is_rejected() {
        assert_eq!(UserCode::new(""), Err(Error::EmptyUserCode));
        assert_eq!(UserCode::new("   "), Err(Error::EmptyUserCode));
    }

    #[test]
    fn blank_display_name_is_rejected() {
        assert_eq!(DisplayName::new(" \t"), Err(Error::EmptyDisplayName));
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();

        let inserted_user = create_user(
            DisplayName::new_unchecked("Rara"),
            UserCode::new_unchecked("abc123"),
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.display_name.as_str(), "Rara");
        assert_eq!(inserted_user.user_code.as_str(), "abc123");
    }

    #[test]
    fn insert_user_fails_on_duplicate_code() {
        let db_connection = get_db_connection();
        create_user(
            DisplayName::new_unchecked("Rara"),
            UserCode::new_unchecked("abc123"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            DisplayName::new_unchecked("Dodi"),
            UserCode::new_unchecked("abc123"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUserCode));
    }

    #[test]
    fn get_user_by_code_finds_exact_match() {
        let db_connection = get_db_connection();
        let want = create_user(
            DisplayName::new_unchecked("Rara"),
            UserCode::new_unchecked("abc123"),
            &db_connection,
        )
        .unwrap();

        let got = get_user_by_code(&UserCode::new_unchecked("abc123"), &db_connection);

        assert_eq!(got, Ok(Some(want)));
    }

    #[test]
    fn get_user_by_code_returns_none_for_unknown_code() {
        let db_connection = get_db_connection();
        create_user(
            DisplayName::new_unchecked("Rara"),
            UserCode::new_unchecked("abc123"),
            &db_connection,
        )
        .unwrap();

        let got = get_user_by_code(&UserCode::new_unchecked("ABC123"), &db_connection);

        assert_eq!(got, Ok(None));
    }
}
