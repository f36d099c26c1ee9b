//! Contact Seeding Tool
//!
//! Fills the contacts table for large listing checks.
//! Run with: cargo run --bin seed_contacts --release -- --count 100000 --batch 5000

use std::time::Instant;

use sqlx::postgres::PgPoolOptions;

/// Names cycled through when seeding; roughly half start with "J"
const NAMES: &[&str] = &["Jane", "Jack", "Bob", "Alice", "Jill", "Carol", "John", "Dan"];

fn arg_value(args: &[String], flag: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let count = arg_value(&args, "--count", 10_000);
    let batch_size = arg_value(&args, "--batch", 1_000).max(1);

    let database_url = std::env::var("DATABASE_URL")?;

    println!("Seeding {} contacts in batches of {}", count, batch_size);
    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    let start = Instant::now();
    let mut inserted = 0u64;

    while inserted < count {
        let size = batch_size.min(count - inserted);
        let names: Vec<String> = (inserted..inserted + size)
            .map(|i| format!("{} {}", NAMES[(i as usize) % NAMES.len()], i))
            .collect();

        let result = sqlx::query("INSERT INTO contacts (name) SELECT * FROM UNNEST($1::text[])")
            .bind(&names)
            .execute(&pool)
            .await?;

        inserted += result.rows_affected();
        println!("Inserted {} contacts...", inserted);
    }

    let elapsed = start.elapsed();
    let rate = inserted as f64 / elapsed.as_secs_f64();

    println!("\n=== Seed Results ===");
    println!("Inserted: {}", inserted);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} contacts/sec", rate);

    pool.close().await;
    Ok(())
}
