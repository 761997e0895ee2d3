//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::Session,
    currency::AmountInput,
    endpoints,
    transaction::{NewTransaction, TransactionType, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was spent or earned.
    pub type_: TransactionType,
    /// The amount as typed, e.g. "1.500.000".
    #[serde(default)]
    pub amount: String,
    /// What the transaction was for.
    #[serde(default)]
    pub category: String,
    /// Optional extra details.
    #[serde(default)]
    pub note: String,
}

/// A route handler for recording a new transaction for the logged in user,
/// redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let amount = AmountInput::parse(&form.amount);

    if !amount.is_valid() {
        return Error::InvalidAmount.into_alert_response();
    }

    // Fifteen digits always fit in an i64.
    let Ok(amount) = i64::try_from(amount.raw) else {
        return Error::InvalidAmount.into_alert_response();
    };

    let transaction = NewTransaction::build(session.user.id, amount, form.type_)
        .category(&form.category)
        .note(&form.note);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Alert::Error {
                message: "Gagal menyimpan transaksi".to_owned(),
                details: "Coba lagi sebentar lagi.".to_owned(),
            }
            .into_html(),
        )
            .into_response();
    }

    (
        HxRedirect(format!("{}?saved=true", endpoints::DASHBOARD_VIEW)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
