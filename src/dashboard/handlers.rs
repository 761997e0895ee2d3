//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rand::Rng;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use time_tz::Tz;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::Session,
    currency::format_rupiah,
    dashboard::{
        micro_copy::select_micro_copy,
        summary::{
            DayGroup, TodaySummary, group_by_day, relative_day_label, today_summary,
            window_bounds,
        },
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
    timezone::{get_timezone, local_now},
    transaction::{Transaction, TransactionType, get_transactions_in_range},
    user::User,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Set after a transaction was saved to confirm it to the user.
    #[serde(default)]
    pub saved: bool,
}

/// Display today's balance and the transactions of the last three days.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let timezone = get_timezone(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let now = local_now(timezone);
    let (start, end) = window_bounds(now.date(), timezone);

    // The page still renders without the transactions so the user can keep
    // adding new ones.
    let (transactions, load_failed) =
        match load_transactions(&state, &session.user, start, end) {
            Ok(transactions) => (transactions, false),
            Err(_) => (Vec::new(), true),
        };

    Ok(dashboard_view(
        &session.user,
        &transactions,
        now,
        timezone,
        DashboardNotices {
            saved: query.saved,
            load_failed,
        },
        &mut rand::rng(),
    )
    .into_response())
}

fn load_transactions(
    state: &DashboardState,
    user: &User,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions_in_range(user.id, start, end, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for the dashboard: {error}"))
}

/// Messages shown above the transactions.
#[derive(Debug, Default, Clone, Copy)]
struct DashboardNotices {
    /// A transaction was just saved.
    saved: bool,
    /// The transactions could not be loaded.
    load_failed: bool,
}

/// Render the dashboard for `user` as of the local time `now`.
fn dashboard_view(
    user: &User,
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
    notices: DashboardNotices,
    rng: &mut impl Rng,
) -> Markup {
    let today = now.date();
    let summary = today_summary(transactions, today, timezone);
    let groups = group_by_day(transactions, timezone);
    let micro_copy = select_micro_copy(now.hour(), summary.balance < 0, rng);

    let content = html! {
        div class={ (PAGE_CONTAINER_STYLE) " space-y-6" }
        {
            div class="flex w-full items-center justify-between"
            {
                div
                {
                    h1 class="text-xl font-bold" { "Halo, " (user.display_name) }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Ada transaksi apa hari ini?" }
                }

                a
                    href=(endpoints::LOG_OUT)
                    title="Keluar"
                    class="text-sm font-medium text-gray-500 hover:text-gray-900 dark:text-gray-400 dark:hover:text-white"
                {
                    "Keluar"
                }
            }

            (balance_card(&summary, micro_copy))

            @if notices.load_failed {
                div id="load-alert" class="w-full"
                {
                    (Alert::Error {
                        message: "Gagal memuat transaksi.".to_owned(),
                        details: "Coba muat ulang halaman.".to_owned(),
                    }.into_html())
                }
            }

            @if notices.saved {
                div id="saved-alert" class="w-full"
                {
                    (Alert::Success {
                        message: "Tersimpan!".to_owned(),
                        details: String::new(),
                    }.into_html())
                }
            }

            (add_button(notices.saved))

            @if groups.is_empty() {
                (empty_state())
            } @else {
                div class="w-full space-y-6"
                {
                    @for group in &groups {
                        (day_group(group, today))
                    }
                }
            }
        }
    };

    base("Dasbor", &content)
}

fn balance_card(summary: &TodaySummary, micro_copy: &str) -> Markup {
    let balance_style = if summary.balance < 0 {
        "text-4xl font-bold tracking-tight text-red-500"
    } else {
        "text-4xl font-bold tracking-tight text-gray-900 dark:text-white"
    };

    html! {
        div class="w-full p-6 bg-white rounded-lg shadow-sm dark:bg-gray-800"
        {
            h2 class="text-sm font-medium text-gray-500 dark:text-gray-400" { "Saldo Hari Ini" }

            p id="balance" class=(balance_style) { (format_rupiah(summary.balance)) }

            p
                id="micro-copy"
                class="mt-3 px-4 py-3 rounded-lg bg-gray-50 dark:bg-gray-900/50 text-xs italic text-gray-500"
            {
                (micro_copy)
            }
        }
    }
}

fn add_button(saved: bool) -> Markup {
    let (style, text) = if saved {
        (
            "block text-center w-full px-4 py-2 bg-green-600 hover:bg-green-700 text-white rounded",
            "Tersimpan ✓",
        )
    } else {
        (BUTTON_PRIMARY_STYLE, "+ Tambah Catatan")
    };

    html! {
        a
            id="add-transaction"
            href=(endpoints::NEW_TRANSACTION_VIEW)
            class={ "block text-center " (style) }
        {
            (text)
        }
    }
}

fn empty_state() -> Markup {
    html! {
        div id="empty-state" class="py-12 px-4 text-center"
        {
            div class="mb-3 text-4xl" { "😴" }
            p class="font-medium text-gray-900 dark:text-gray-100" { "Belum ada catatan" }
            p class="mt-1 text-sm text-gray-500" { "Klik tombol + buat mulai mencatat." }
        }
    }
}

fn day_group(group: &DayGroup<'_>, today: Date) -> Markup {
    html! {
        section class="day-group space-y-3"
        {
            h3 class="pl-1 text-sm font-medium text-gray-500" { (relative_day_label(group.date, today)) }

            ul class="space-y-3"
            {
                @for transaction in &group.transactions {
                    (transaction_row(transaction))
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (sign, amount_style) = match transaction.type_ {
        TransactionType::Income => ("+", "font-bold text-green-600"),
        TransactionType::Expense => ("−", "font-medium text-gray-500 dark:text-gray-400"),
    };

    html! {
        li class="flex items-center justify-between p-4 bg-white rounded-lg dark:bg-gray-800"
        {
            div class="flex flex-col"
            {
                span class="font-medium text-gray-900 dark:text-gray-100" { (transaction.category) }

                @if let Some(note) = &transaction.note {
                    span class="max-w-40 truncate text-xs text-gray-400" { (note) }
                }
            }

            span class={ "amount " (amount_style) }
            {
                (sign) " " (format_rupiah(transaction.amount))
            }
        }
    }
}
