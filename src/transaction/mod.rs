//! Transactions: the income and expenses a user records.
//!
//! This module contains:
//! - The `Transaction` model and `NewTransaction` builder
//! - Database functions for storing and querying transactions
//! - The page and endpoints for recording a new transaction

mod amount_field;
mod core;
mod create_endpoint;
mod create_page;

pub use amount_field::post_amount_field;
pub use core::{
    DEFAULT_CATEGORY, NewTransaction, Transaction, TransactionType, create_transaction,
    create_transaction_table, get_transactions_in_range, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
