use anyhow::{Context, Result};
use clap::Parser;
use ripple_server::db::Database;
use ripple_server::seed::{BulkStore, GenerationConfig, Seeder};

/// Ripple Test-Data Seeding Utility
///
/// Runs the same bulk generation pipeline as the server's
/// POST /generate-test-data endpoint, directly against a database file.
/// Useful for preparing load-test databases without starting the server.
#[derive(Parser, Debug)]
#[command(name = "ripple-seed")]
#[command(about = "Seed a Ripple database with bulk test data", long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "./ripple.db")]
    database: String,

    /// Number of users to create
    #[arg(long, default_value_t = 1000)]
    users: u64,

    /// Posts generated per user
    #[arg(long, default_value_t = 1000)]
    posts_per_user: u64,

    /// Rows per insert batch
    #[arg(long, default_value_t = 1000)]
    batch_size: u64,

    /// Disable parallel payload generation
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Surface the pipeline's progress logging on stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripple_server=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let db = Database::new(&args.database)
        .with_context(|| format!("Failed to open database at {}", args.database))?;
    db.initialize()
        .context("Failed to initialize database schema")?;

    let config = GenerationConfig {
        users: args.users,
        posts_per_user: args.posts_per_user,
        batch_size: args.batch_size,
        parallel: !args.sequential,
    };

    println!(
        "Seeding {} with {} users x {} posts (batches of {})...",
        args.database, args.users, args.posts_per_user, args.batch_size
    );

    let store = BulkStore::new(db.connection()?);
    let summary = Seeder::new(store, config)
        .run()
        .context("Generation run failed")?;

    println!("{} ({} posts)", summary.message, summary.total_posts);
    Ok(())
}
