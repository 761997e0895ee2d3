//! Signing up: generating a new access code and creating the user that owns it.
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use maud::Markup;
use serde::Deserialize;

use crate::{
    Error,
    access_code::{RegistrationOutcome, generate_access_code, register_access_code},
    log_in::{EMPTY_CODE_ERROR_MSG, LoginState, code_step_view, name_step_view, start_session},
    user::{DisplayName, UserCode},
};

const EMPTY_NAME_ERROR_MSG: &str = "Nama belum diisi.";
const CODE_TAKEN_ERROR_MSG: &str = "Kode ini baru saja dipakai orang lain. Coba kode lain.";

/// Generate a fresh access code and go straight to the display name step.
pub async fn post_new_code() -> Markup {
    let user_code = generate_access_code(&mut rand::rng());

    name_step_view(&user_code, None)
}

/// The data entered in the display name step.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub display_name: String,
    /// The access code carried over from the first step.
    #[serde(default)]
    pub user_code: String,
}

/// Create a user for the access code in the form and log them in.
///
/// If the code was claimed by someone else in the meantime, the user is sent
/// back to the code step.
pub async fn create_user_endpoint(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let Ok(user_code) = UserCode::new(&form.user_code) else {
        return code_step_view(Some(EMPTY_CODE_ERROR_MSG)).into_response();
    };

    let Ok(display_name) = DisplayName::new(&form.display_name) else {
        return name_step_view(&user_code, Some(EMPTY_NAME_ERROR_MSG)).into_response();
    };

    let outcome = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        register_access_code(display_name, user_code, &connection)
    };

    match outcome {
        Ok(RegistrationOutcome::Created(user)) => {
            tracing::info!("Created user {}", user.id);
            start_session(jar, &user, state.cookie_duration)
        }
        Ok(RegistrationOutcome::CodeTaken(_)) => {
            tracing::warn!("Access code was claimed before the user could be created");
            code_step_view(Some(CODE_TAKEN_ERROR_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("could not create user: {error}");
            error.into_alert_response()
        }
    }
}
