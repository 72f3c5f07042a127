//! # Fixture Checker
//!
//! Loads a fixtures directory the way the store does at startup and reports
//! what it found.
//!
//! ## Usage
//! ```bash
//! # Check the embedded demo data
//! cargo run -p crema-store --bin check-fixtures
//!
//! # Check a directory
//! cargo run -p crema-store --bin check-fixtures -- --dir ./data
//!
//! # Machine-readable report
//! cargo run -p crema-store --bin check-fixtures -- --dir ./data --json
//! ```
//!
//! Exits with an error if a file fails to parse, an id is duplicated, or a
//! record references something that does not exist. Balances that disagree
//! with their history are repaired in memory and listed, not treated as
//! failures.

use std::env;
use std::path::PathBuf;

use crema_store::{FixtureSet, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut dir: Option<PathBuf> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" | "-d" => {
                if i + 1 < args.len() {
                    dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Crema Fixture Checker");
                println!();
                println!("Usage: check-fixtures [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --dir <PATH>   Fixtures directory (default: embedded demo data)");
                println!("      --json         Print the seed report as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    let fixtures = match &dir {
        Some(path) => FixtureSet::from_dir(path).await?,
        None => FixtureSet::embedded()?,
    };
    let store = Store::from_fixtures(fixtures)?;
    let report = store.seed_report();

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Crema Fixture Checker");
    println!("=====================");
    match &dir {
        Some(path) => println!("Source: {}", path.display()),
        None => println!("Source: embedded"),
    }
    println!();
    println!("  products                 {}", report.products);
    println!("  customers                {}", report.customers);
    println!("  customer transactions    {}", report.transactions);
    println!("  feedback                 {}", report.feedback);
    println!("  staff                    {}", report.staff);
    println!("  shifts                   {}", report.shifts);
    println!("  inventory items          {}", report.inventory_items);
    println!("  inventory transactions   {}", report.inventory_transactions);
    println!();

    if report.repaired_balances.is_empty() {
        println!("✓ All points balances match their history");
    } else {
        println!(
            "⚠ {} points balance(s) disagreed with history:",
            report.repaired_balances.len()
        );
        for repair in &report.repaired_balances {
            println!(
                "  {}: stored {}, history says {}",
                repair.customer_id, repair.stored, repair.expected
            );
        }
    }

    let low = store.inventory().low_stock().await;
    if !low.is_empty() {
        println!();
        println!("Low stock:");
        for item in low {
            println!(
                "  {} ({} {} on hand, reorder at {})",
                item.name,
                item.quantity_on_hand(),
                item.unit,
                item.reorder_level
            );
        }
    }

    Ok(())
}
