//! This file defines the log-in page and the handler for submitting an access code.
//!
//! Logging in happens in up to two steps inside the same card: the user
//! enters an access code, and if nobody owns that code yet, picks a display
//! name before the account is created (see [crate::register_user]).

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    access_code::{AccessCodeOutcome, resolve_access_code},
    auth::{invalidate_session_cookie, set_session_cookie},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_HINT_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        log_in_card, submit_button,
    },
    user::{User, UserCode},
};

pub(crate) const EMPTY_CODE_ERROR_MSG: &str = "Kode belum diisi.";

fn form_error(message: &str) -> Markup {
    html! {
        p class="form-error mt-2 text-sm text-red-600 dark:text-red-500" { (message) }
    }
}

/// The first step of the log-in flow where the user enters their access code.
pub(crate) fn code_step_view(error_message: Option<&str>) -> Markup {
    html! {
        div class="space-y-4"
        {
            form
                hx-post=(endpoints::LOG_IN_API)
                hx-target="#access-step"
                hx-target-error="#alert-container"
                class="space-y-4"
            {
                div
                {
                    label for="user_code" class=(FORM_LABEL_STYLE) { "Masuk" }

                    input
                        name="user_code"
                        id="user_code"
                        type="password"
                        placeholder="Kode kamu"
                        autocomplete="off"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);

                    @if let Some(message) = error_message {
                        (form_error(message))
                    }

                    p class=(FORM_HINT_STYLE) { "Kode ini dipakai buat masuk." }
                }

                (submit_button("submit-button", "Lanjut", "Sebentar...", false))
            }

            div class="relative"
            {
                div class="absolute inset-0 flex items-center"
                {
                    span class="w-full border-t border-gray-200 dark:border-gray-700" {}
                }

                div class="relative flex justify-center text-xs uppercase"
                {
                    span class="px-2 bg-white text-gray-500 dark:bg-gray-800 dark:text-gray-400" { "Atau" }
                }
            }

            form
                hx-post=(endpoints::NEW_CODE_API)
                hx-target="#access-step"
                hx-target-error="#alert-container"
            {
                button type="submit" id="new-code-button" class=(BUTTON_SECONDARY_STYLE)
                {
                    "Belum punya kode? Buat baru"
                }
            }
        }
    }
}

/// The second step of the log-in flow where a new user picks a display name
/// for the unclaimed `user_code`.
pub(crate) fn name_step_view(user_code: &UserCode, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target="#access-step"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div class="p-3 text-sm text-blue-800 bg-blue-50 rounded-md border border-blue-100 dark:bg-gray-900 dark:text-blue-300 dark:border-blue-900"
            {
                span class="block mb-1 font-semibold" { "Kode Akun Baru" }
                "Simpan kode ini buat masuk nanti:"

                button
                    type="button"
                    id="new-code"
                    data-code=(user_code)
                    onclick="navigator.clipboard.writeText(this.dataset.code)"
                    class="block w-full mt-2 p-2 font-mono text-lg text-center tracking-wider bg-white rounded border border-blue-200 select-all cursor-pointer active:scale-95 transition-transform dark:bg-gray-800"
                {
                    (user_code)
                }

                span class="block mt-1 text-xs text-center text-blue-600" { "(Klik untuk salin)" }
            }

            input type="hidden" name="user_code" value=(user_code);

            div
            {
                label for="display_name" class=(FORM_LABEL_STYLE) { "Nama panggilan kamu?" }

                input
                    name="display_name"
                    id="display_name"
                    type="text"
                    placeholder="Isi nama kamu"
                    autocomplete="off"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(message) = error_message {
                    (form_error(message))
                }

                p class=(FORM_HINT_STYLE) { "Nama ini cuma buat tampilan." }
            }

            (submit_button("submit-button", "Mulai", "Menyimpan...", false))

            a
                href=(endpoints::LOG_IN_VIEW)
                id="change-code"
                class="block w-full text-xs text-center text-gray-500 hover:text-gray-900 dark:text-gray-400 dark:hover:text-white"
            {
                "Ganti Kode"
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let content = log_in_card(&code_step_view(None));

    base("Masuk", &content).into_response()
}

/// The state needed to log a user in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The access code entered in the first step of the log-in flow.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInForm {
    #[serde(default)]
    pub user_code: String,
}

/// Handler for submitting an access code.
///
/// Logs in the owner of the code and redirects to the dashboard, or moves to
/// the display name step if nobody owns the code yet.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let Ok(user_code) = UserCode::new(&form.user_code) else {
        return code_step_view(Some(EMPTY_CODE_ERROR_MSG)).into_response();
    };

    let outcome = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        resolve_access_code(user_code, &connection)
    };

    match outcome {
        Ok(AccessCodeOutcome::LogIn(user)) => {
            tracing::info!("Welcome back user {}", user.id);
            start_session(jar, &user, state.cookie_duration)
        }
        Ok(AccessCodeOutcome::NeedsDisplayName(user_code)) => {
            name_step_view(&user_code, None).into_response()
        }
        Err(error) => {
            tracing::error!("could not look up access code: {error}");
            error.into_alert_response()
        }
    }
}

/// Set the session cookie for `user` and send the client to the dashboard.
pub(crate) fn start_session(jar: PrivateCookieJar, user: &User, duration: Duration) -> Response {
    set_session_cookie(jar.clone(), user, duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting session cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}
