//! Summarises the transactions shown on the dashboard.
//!
//! The dashboard covers a rolling window of today and the two days before
//! it. Days are local calendar days, so every function here takes the
//! configured timezone. The UTC offset is looked up per instant since it can
//! change between the days of the window.

use std::collections::BTreeMap;

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Weekday, macros::time};
use time_tz::{Offset, OffsetDateTimeExt, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::transaction::{Transaction, TransactionType};

/// How many days before today the dashboard window starts.
const WINDOW_DAYS_BEFORE_TODAY: i64 = 2;

/// The first and last instant of the dashboard window ending on `today`.
///
/// The window starts at the local midnight two days before `today` and ends
/// at the last instant of `today`, both inclusive.
pub fn window_bounds(today: Date, timezone: &Tz) -> (OffsetDateTime, OffsetDateTime) {
    let first_day = today.saturating_sub(Duration::days(WINDOW_DAYS_BEFORE_TODAY));

    let start = assume_local(first_day.midnight(), timezone);
    let end = assume_local(today.with_time(time!(23:59:59.999_999_999)), timezone);

    (start, end)
}

/// Attach the offset `timezone` has at the wall clock time `local`.
///
/// A time repeated by a clock change takes the earlier offset. A time skipped
/// by one takes the offset in effect just after the change.
fn assume_local(local: PrimitiveDateTime, timezone: &Tz) -> OffsetDateTime {
    local.assume_timezone(timezone).take_first().unwrap_or_else(|| {
        let offset = timezone.get_offset_utc(&local.assume_utc()).to_utc();
        local.assume_offset(offset)
    })
}

fn local_date(instant: OffsetDateTime, timezone: &Tz) -> Date {
    instant.to_timezone(timezone).date()
}

/// The totals for the transactions recorded today.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TodaySummary {
    pub total_income: i64,
    pub total_expense: i64,
    /// Income minus expenses, negative when more was spent than earned.
    pub balance: i64,
}

/// Total up the transactions in `transactions` whose local date is `today`.
///
/// Totals saturate at the bounds of `i64` instead of overflowing.
pub fn today_summary(transactions: &[Transaction], today: Date, timezone: &Tz) -> TodaySummary {
    let mut summary = transactions
        .iter()
        .filter(|transaction| local_date(transaction.occurred_at, timezone) == today)
        .fold(TodaySummary::default(), |mut summary, transaction| {
            match transaction.type_ {
                TransactionType::Income => {
                    summary.total_income = summary.total_income.saturating_add(transaction.amount)
                }
                TransactionType::Expense => {
                    summary.total_expense =
                        summary.total_expense.saturating_add(transaction.amount)
                }
            }

            summary
        });

    summary.balance = summary.total_income.saturating_sub(summary.total_expense);
    summary
}

/// The transactions that happened on one local calendar day.
#[derive(Debug, PartialEq)]
pub struct DayGroup<'a> {
    pub date: Date,
    pub transactions: Vec<&'a Transaction>,
}

/// Group `transactions` by their local date, newest day first.
///
/// Transactions keep their order within a day.
pub fn group_by_day<'a>(transactions: &'a [Transaction], timezone: &Tz) -> Vec<DayGroup<'a>> {
    let mut groups: BTreeMap<Date, Vec<&Transaction>> = BTreeMap::new();

    for transaction in transactions {
        let date = local_date(transaction.occurred_at, timezone);
        groups.entry(date).or_default().push(transaction);
    }

    groups
        .into_iter()
        .rev()
        .map(|(date, transactions)| DayGroup { date, transactions })
        .collect()
}

/// The heading for the transactions on `date`, relative to `today`.
pub fn relative_day_label(date: Date, today: Date) -> &'static str {
    match (today - date).whole_days() {
        0 => "Hari Ini",
        1 => "Kemarin",
        2 => "2 hari lalu",
        _ => weekday_name(date.weekday()),
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Senin",
        Weekday::Tuesday => "Selasa",
        Weekday::Wednesday => "Rabu",
        Weekday::Thursday => "Kamis",
        Weekday::Friday => "Jumat",
        Weekday::Saturday => "Sabtu",
        Weekday::Sunday => "Minggu",
    }
}
