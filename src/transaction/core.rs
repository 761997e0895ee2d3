//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, user::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// The category given to transactions when the user leaves it blank.
pub const DEFAULT_CATEGORY: &str = "Umum";

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that came in, e.g. a salary.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are never edited or deleted once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The user that recorded the transaction.
    pub user_id: UserId,
    /// The amount in whole Rupiah, always greater than zero.
    pub amount: i64,
    /// Whether `amount` was earned or spent.
    pub type_: TransactionType,
    /// What the transaction was for, e.g. "Makan".
    pub category: String,
    /// Extra details, if the user gave any.
    pub note: Option<String>,
    /// When the transaction was recorded.
    pub occurred_at: OffsetDateTime,
}

/// A transaction that has not been saved yet.
///
/// To create a new `NewTransaction`, use [NewTransaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    user_id: UserId,
    amount: i64,
    type_: TransactionType,
    category: String,
    note: Option<String>,
    occurred_at: OffsetDateTime,
}

impl NewTransaction {
    /// Start a transaction for `user_id` that happened now.
    ///
    /// The category defaults to [DEFAULT_CATEGORY] and the note to none.
    pub fn build(user_id: UserId, amount: i64, type_: TransactionType) -> Self {
        Self {
            user_id,
            amount,
            type_,
            category: DEFAULT_CATEGORY.to_owned(),
            note: None,
            occurred_at: OffsetDateTime::now_utc(),
        }
    }

    /// Set the category, falling back to [DEFAULT_CATEGORY] if `category` is blank.
    pub fn category(mut self, category: &str) -> Self {
        let category = category.trim();

        self.category = if category.is_empty() {
            DEFAULT_CATEGORY.to_owned()
        } else {
            category.to_owned()
        };

        self
    }

    /// Set the note, a blank note is stored as no note.
    pub fn note(mut self, note: &str) -> Self {
        let note = note.trim();

        self.note = (!note.is_empty()).then(|| note.to_owned());

        self
    }

    /// Override when the transaction happened.
    pub fn occurred_at(mut self, occurred_at: OffsetDateTime) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// `occurred_at` is stored with a precision of one second.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error, e.g. the user
///   does not exist.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if transaction.amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, type, category, note, occurred_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, amount, type, category, note, occurred_at",
        )?
        .query_row(
            (
                transaction.user_id.as_i64(),
                transaction.amount,
                transaction.type_,
                transaction.category,
                transaction.note,
                transaction.occurred_at.unix_timestamp(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get the transactions of `user_id` that happened between `start` and `end`, inclusive.
///
/// The newest transactions come first, transactions recorded in the same
/// second are ordered by when they were inserted, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_in_range(
    user_id: UserId,
    start: OffsetDateTime,
    end: OffsetDateTime,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, amount, type, category, note, occurred_at
             FROM \"transaction\"
             WHERE user_id = :user_id AND occurred_at BETWEEN :start AND :end
             ORDER BY occurred_at DESC, id DESC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":start": start.unix_timestamp(),
                ":end": end.unix_timestamp(),
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                note TEXT,
                occurred_at INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Add composite index used by the dashboard page.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_occurred_at
            ON \"transaction\"(user_id, occurred_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let amount = row.get(2)?;
    let type_ = row.get(3)?;
    let category = row.get(4)?;
    let note = row.get(5)?;
    let occurred_at: i64 = row.get(6)?;

    let occurred_at = OffsetDateTime::from_unix_timestamp(occurred_at).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id,
        user_id: UserId::new(user_id),
        amount,
        type_,
        category,
        note,
        occurred_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
