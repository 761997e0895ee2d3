//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user submitted an access code that is empty or only whitespace.
    #[error("the access code is empty")]
    EmptyUserCode,

    /// The user submitted a display name that is empty or only whitespace.
    #[error("the display name is empty")]
    EmptyDisplayName,

    /// The access code was claimed by another user between looking it up and
    /// creating the new user.
    ///
    /// The client should go back to the code entry step and try a different
    /// code.
    #[error("the access code is already in use")]
    DuplicateUserCode,

    /// The transaction amount was zero, empty or contained no digits.
    ///
    /// Amounts are whole Rupiah and must be greater than zero, the sign is
    /// carried by the transaction type instead.
    #[error("the amount must be greater than zero")]
    InvalidAmount,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The session cookie was present but its contents could not be decoded.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not decode the session cookie: {0}")]
    InvalidSessionCookie(String),

    /// The expiry date-time of the session could not be computed.
    #[error("could not create expiry date-time: {0}")]
    InvalidDateFormat(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.user_code") =>
            {
                Error::DuplicateUserCode
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Zona Waktu Tidak Valid",
                fix: &format!(
                    "Zona waktu \"{timezone}\" tidak dikenali. Periksa pengaturan server dan \
                    pastikan zona waktu berupa nama kanonis, misalnya \"Asia/Jakarta\"."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for the `#alert-container` of the page
    /// that made the htmx request.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Nominal harus lebih dari 0.".to_owned(),
                    details: "Isi nominal dengan angka, tanpa koma.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Zona Waktu Tidak Valid".to_owned(),
                    details: format!(
                        "Zona waktu \"{timezone}\" tidak dikenali. Periksa pengaturan server dan \
                        pastikan zona waktu berupa nama kanonis, misalnya \"Asia/Jakarta\"."
                    ),
                },
            ),
            Error::SqlError(_) | Error::DatabaseLockError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Ada masalah koneksi. Coba lagi.".to_owned(),
                    details: String::new(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Terjadi kesalahan".to_owned(),
                        details: "Ada kesalahan yang tidak terduga, cek log server untuk detailnya."
                            .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
