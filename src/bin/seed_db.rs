use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use tally::{AppState, NewTransaction, TransactionType};

/// A utility for creating a database with sample transactions for the tally API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_TRANSACTIONS: [(f64, TransactionType, &str, &str); 10] = [
    (4200.0, TransactionType::Income, "Salary", "Monthly pay"),
    (1450.0, TransactionType::Expense, "Bills", "Rent"),
    (132.4, TransactionType::Expense, "Food", "Weekly groceries"),
    (18.5, TransactionType::Expense, "Food", "Lunch"),
    (60.0, TransactionType::Expense, "Transport", "Fuel"),
    (24.99, TransactionType::Expense, "Entertainment", "Streaming"),
    (350.0, TransactionType::Income, "Freelance", "Logo design"),
    (89.95, TransactionType::Expense, "Shopping", "Running shoes"),
    (115.2, TransactionType::Expense, "Bills", "Power"),
    (12.0, TransactionType::Expense, "Other", ""),
];

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
    let state = AppState::new(conn)?;

    println!("Creating sample transactions...");

    let now = OffsetDateTime::now_utc();
    let count = SAMPLE_TRANSACTIONS.len();

    for (days_ago, (amount, kind, category, description)) in
        SAMPLE_TRANSACTIONS.into_iter().rev().enumerate()
    {
        let created_at = now - Duration::days(days_ago as i64 * 2);

        state.transaction_store.create(NewTransaction {
            amount,
            description: if description.is_empty() {
                tally::DEFAULT_DESCRIPTION.to_owned()
            } else {
                description.to_owned()
            },
            category: category.to_owned(),
            kind,
            date: created_at.date().to_string(),
            created_at,
        })?;
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
