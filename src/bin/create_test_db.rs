use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use catetin::{
    DisplayName, NewTransaction, TransactionType, UserCode, create_transaction, create_user,
    initialize_db,
};

/// A utility for creating a test database for the Catetin server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The access code for logging in as the demo user.
const DEMO_USER_CODE: &str = "demo123";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo user with the access code {DEMO_USER_CODE:?}...");
    let user = create_user(
        DisplayName::new("Demo")?,
        UserCode::new(DEMO_USER_CODE)?,
        &conn,
    )?;

    println!("Creating transactions for the last three days...");
    let now = OffsetDateTime::now_utc();
    let transactions = [
        (0, 250_000, TransactionType::Income, "Gaji", "Uang lembur"),
        (0, 25_000, TransactionType::Expense, "Makan", "Nasi padang"),
        (0, 15_000, TransactionType::Expense, "Transport", ""),
        (1, 120_000, TransactionType::Expense, "Belanja", "Sayur dan buah"),
        (1, 50_000, TransactionType::Income, "", "Dikasih teman"),
        (2, 8_000, TransactionType::Expense, "Makan", "Kopi"),
        (2, 300_000, TransactionType::Expense, "Listrik", ""),
    ];

    for (days_ago, amount, type_, category, note) in transactions {
        create_transaction(
            NewTransaction::build(user.id, amount, type_)
                .category(category)
                .note(note)
                .occurred_at(now - Duration::days(days_ago)),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
