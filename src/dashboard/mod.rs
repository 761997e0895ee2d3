//! Dashboard module
//!
//! Shows today's balance and the transactions of the last three days,
//! grouped by day.

mod handlers;
mod micro_copy;
mod summary;

pub use handlers::get_dashboard_page;
