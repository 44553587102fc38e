//! Generation orchestrator: drives user and post batches to completion.

use std::ops::Range;

use chrono::{DateTime, Utc};

use super::generator::{self, NewPost};
use super::{chunk, BulkStore, SeedError};

/// Batches smaller than this are generated on the calling thread
const PARALLEL_MIN_BATCH: usize = 1024;

/// Parameters of one generation run
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Number of users to create in the initial bulk batch
    pub users: u64,
    /// Posts created per user
    pub posts_per_user: u64,
    /// Rows per insert batch. Each batch is one multi-row statement, so this
    /// also bounds the statement's bound-parameter count (4 per post row,
    /// well under SQLite's 32k limit at the default size).
    pub batch_size: u64,
    /// Fan payload generation out across threads for large batches
    pub parallel: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            users: 1_000,
            posts_per_user: 1_000,
            batch_size: 1_000,
            parallel: true,
        }
    }
}

/// Outcome of a completed generation run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub message: String,
    pub total_posts: u64,
}

/// Coordinates the generator, partitioner and bulk store for one run.
///
/// The run is fail-fast: a storage failure rolls back the in-flight batch,
/// restores the engine tuning and propagates. Batches committed before the
/// failure stay in the store; re-running against the same index range then
/// fails on the username uniqueness constraint rather than duplicating data.
pub struct Seeder {
    store: BulkStore,
    config: GenerationConfig,
}

impl Seeder {
    pub fn new(store: BulkStore, config: GenerationConfig) -> Self {
        Self { store, config }
    }

    /// Run the full pipeline: one user batch, then posts in bounded batches
    pub fn run(mut self) -> Result<GenerationSummary, SeedError> {
        let config = self.config.clone();
        let total_posts = config
            .users
            .checked_mul(config.posts_per_user)
            .ok_or_else(|| {
                SeedError::InvalidArgument("user and post counts overflow".to_string())
            })?;

        tracing::info!(
            users = config.users,
            posts_per_user = config.posts_per_user,
            batch_size = config.batch_size,
            total_posts,
            "starting test-data generation"
        );

        self.store
            .with_bulk_tuning(|store| Self::generate(store, &config, total_posts))
    }

    fn generate(
        store: &mut BulkStore,
        config: &GenerationConfig,
        total_posts: u64,
    ) -> Result<GenerationSummary, SeedError> {
        // Users go in as a single batch, with posts_count already at its
        // final value so no per-post counter maintenance is needed.
        let users: Vec<_> = (0..config.users)
            .map(|i| generator::fake_user(i, config.posts_per_user))
            .collect();
        let user_ids = store.insert_users(&users)?;
        drop(users);
        tracing::info!(count = user_ids.len(), "user batch committed");

        let base = generator::base_date();
        let mut last_logged_pct = 0;
        for range in chunk::chunk_ranges(total_posts, config.batch_size)? {
            // The whole batch is attributed to the "current" user derived
            // from how many posts precede it
            let author = user_ids[(range.start / config.posts_per_user) as usize];
            let payloads = Self::generate_posts(&range, author, base, config.parallel)?;
            store.insert_posts(&payloads)?;

            let pct = range.end * 100 / total_posts;
            tracing::debug!(
                inserted = range.end,
                total = total_posts,
                percent = pct,
                "post batch committed"
            );
            if pct / 10 > last_logged_pct / 10 {
                tracing::info!(percent = pct, inserted = range.end, "generation progress");
                last_logged_pct = pct;
            }
        }

        tracing::info!(total_posts, "test-data generation complete");
        Ok(GenerationSummary {
            message: "Test data generated successfully".to_string(),
            total_posts,
        })
    }

    /// Build the payloads for one batch, optionally fanning the generation
    /// out over scoped worker threads. Inserts stay single-writer either way.
    fn generate_posts(
        range: &Range<u64>,
        user_id: i64,
        base: DateTime<Utc>,
        parallel: bool,
    ) -> Result<Vec<NewPost>, SeedError> {
        let len = (range.end - range.start) as usize;
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        if !parallel || workers < 2 || len < PARALLEL_MIN_BATCH {
            return Ok(range
                .clone()
                .map(|i| generator::fake_post(i, user_id, base))
                .collect());
        }

        let pieces = chunk::split_even(range.end - range.start, workers as u64)?;
        let mut payloads = Vec::with_capacity(len);
        std::thread::scope(|s| {
            let handles: Vec<_> = pieces
                .into_iter()
                .map(|piece| {
                    let start = range.start + piece.start;
                    let end = range.start + piece.end;
                    s.spawn(move || {
                        (start..end)
                            .map(|i| generator::fake_post(i, user_id, base))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                payloads.extend(handle.join().expect("post generation worker panicked"));
            }
        });
        Ok(payloads)
    }
}
