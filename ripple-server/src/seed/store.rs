//! Bulk persistence gateway: multi-row inserts with per-batch commits and
//! scoped storage-engine tuning.

use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::db::DbConnection;

use super::generator::{NewPost, NewUser};
use super::SeedError;

/// Gateway over a single connection for the duration of one generation run.
///
/// Each insert method issues one multi-row statement inside an explicit
/// transaction and commits it: the batch either becomes fully visible or, on
/// failure, rolls back when the uncommitted transaction is dropped. Batches
/// committed earlier are never undone here.
pub struct BulkStore {
    conn: DbConnection,
}

impl BulkStore {
    pub fn new(conn: DbConnection) -> Self {
        Self { conn }
    }

    /// Run `f` with bulk tuning pragmas applied, restoring the engine
    /// defaults before returning on both the success and failure paths.
    pub fn with_bulk_tuning<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SeedError>,
    ) -> Result<T, SeedError> {
        self.apply_bulk_tuning()?;
        let result = f(self);

        if let Err(err) = self.restore_default_tuning() {
            tracing::warn!(error = %err, "failed to restore storage tuning defaults");
            if result.is_ok() {
                return Err(err);
            }
        }
        result
    }

    /// Trade durability for throughput while the run is in flight
    fn apply_bulk_tuning(&self) -> Result<(), SeedError> {
        self.conn.pragma_update(None, "synchronous", "OFF")?;
        self.conn.pragma_update(None, "journal_mode", "MEMORY")?;
        self.conn.pragma_update(None, "cache_size", -64_000)?;
        Ok(())
    }

    /// Resume the engine's ordinary durability guarantees
    fn restore_default_tuning(&self) -> Result<(), SeedError> {
        self.conn.pragma_update(None, "synchronous", "FULL")?;
        self.conn.pragma_update(None, "journal_mode", "DELETE")?;
        self.conn.pragma_update(None, "cache_size", -2_000)?;
        Ok(())
    }

    /// Insert a homogeneous batch of users in one statement and commit.
    /// Returns the store-assigned ids in insertion order.
    pub fn insert_users(&mut self, users: &[NewUser]) -> Result<Vec<i64>, SeedError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let sql = multi_row_insert_sql("users", &["username", "email", "posts_count"], users.len());
        let mut values = Vec::with_capacity(users.len() * 3);
        for user in users {
            values.push(Value::Text(user.username.clone()));
            values.push(Value::Text(user.email.clone()));
            values.push(Value::Integer(user.posts_count));
        }

        let tx = self.conn.transaction()?;
        tx.execute(&sql, params_from_iter(values))?;

        // Read the batch's ids back inside the same transaction; taking the
        // newest n keeps pre-existing rows out of the run.
        let mut ids: Vec<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM users ORDER BY id DESC LIMIT ?")?;
            let ids = stmt.query_map([users.len() as i64], |row| row.get(0))?
                .collect::<Result<_, _>>()?;
            ids
        };
        ids.reverse();

        tx.commit()?;
        Ok(ids)
    }

    /// Insert a homogeneous batch of posts in one statement and commit
    pub fn insert_posts(&mut self, posts: &[NewPost]) -> Result<(), SeedError> {
        if posts.is_empty() {
            return Ok(());
        }

        let sql = multi_row_insert_sql(
            "posts",
            &["user_id", "content", "likes", "created_at"],
            posts.len(),
        );
        let mut values = Vec::with_capacity(posts.len() * 4);
        for post in posts {
            values.push(Value::Integer(post.user_id));
            values.push(Value::Text(post.content.clone()));
            values.push(Value::Integer(post.likes));
            values.push(Value::Text(post.created_at.to_rfc3339()));
        }

        let tx = self.conn.transaction()?;
        tx.execute(&sql, params_from_iter(values))?;
        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

/// `INSERT INTO table (c1, c2) VALUES (?, ?), (?, ?), ...` for `rows` rows
fn multi_row_insert_sql(table: &str, columns: &[&str], rows: usize) -> String {
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    let values = vec![placeholders.as_str(); rows].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        table,
        columns.join(", "),
        values
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::seed::generator;
    use chrono::Utc;

    fn file_backed_store() -> (tempfile::TempDir, Database, BulkStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::new(dir.path().join("ripple-test.db")).expect("create db");
        db.initialize().expect("initialize schema");
        let store = BulkStore::new(db.connection().expect("connection"));
        (dir, db, store)
    }

    fn synchronous_level(store: &BulkStore) -> i64 {
        store
            .raw()
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .expect("query synchronous pragma")
    }

    #[test]
    fn test_multi_row_insert_sql_shape() {
        let sql = multi_row_insert_sql("users", &["a", "b"], 3);
        assert_eq!(sql, "INSERT INTO users (a, b) VALUES (?, ?), (?, ?), (?, ?)");
    }

    #[test]
    fn test_insert_users_returns_ids_in_insertion_order() {
        let (_dir, _db, mut store) = file_backed_store();

        let users: Vec<_> = (0..5).map(|i| generator::fake_user(i, 10)).collect();
        let ids = store.insert_users(&users).expect("insert users");

        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insert_users_skips_preexisting_rows_in_id_capture() {
        let (_dir, _db, mut store) = file_backed_store();

        let earlier = store
            .insert_users(&[generator::fake_user(100, 1)])
            .expect("insert earlier user");
        let ids = store
            .insert_users(&[generator::fake_user(0, 1), generator::fake_user(1, 1)])
            .expect("insert batch");

        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&earlier[0]));
    }

    #[test]
    fn test_failed_batch_rolls_back_entirely() {
        let (_dir, _db, mut store) = file_backed_store();

        let user = generator::fake_user(0, 1);
        let duplicate = user.clone();
        let err = store
            .insert_users(&[user, duplicate])
            .expect_err("duplicate usernames in one batch must fail");
        assert!(matches!(err, SeedError::Storage(_)));

        // The whole batch rolled back, not just the offending row
        let count: i64 = store
            .raw()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .expect("count users");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_insert_posts_commits_batch() {
        let (_dir, _db, mut store) = file_backed_store();

        let ids = store
            .insert_users(&[generator::fake_user(0, 2)])
            .expect("insert user");
        let base = generator::base_date();
        let posts: Vec<_> = (0..2).map(|i| generator::fake_post(i, ids[0], base)).collect();
        store.insert_posts(&posts).expect("insert posts");

        let count: i64 = store
            .raw()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .expect("count posts");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_empty_batches_are_noops() {
        let (_dir, _db, mut store) = file_backed_store();
        assert!(store.insert_users(&[]).expect("empty users").is_empty());
        store.insert_posts(&[]).expect("empty posts");
    }

    #[test]
    fn test_bulk_tuning_is_restored_on_success() {
        let (_dir, _db, mut store) = file_backed_store();

        store
            .with_bulk_tuning(|store| {
                // synchronous = OFF while the run is in flight
                assert_eq!(synchronous_level(store), 0);
                Ok(())
            })
            .expect("tuned run");

        // synchronous = FULL once the scope is unwound
        assert_eq!(synchronous_level(&store), 2);
    }

    #[test]
    fn test_bulk_tuning_is_restored_on_failure() {
        let (_dir, _db, mut store) = file_backed_store();

        let err = store
            .with_bulk_tuning(|_| -> Result<(), SeedError> {
                Err(SeedError::InvalidArgument("boom".to_string()))
            })
            .expect_err("inner failure must propagate");

        assert!(matches!(err, SeedError::InvalidArgument(_)));
        assert_eq!(synchronous_level(&store), 2);
    }

    #[test]
    fn test_storage_failure_mid_tuned_run_keeps_committed_prefix() {
        let (_dir, _db, mut store) = file_backed_store();

        let result = store.with_bulk_tuning(|store| {
            let ids = store.insert_users(&[generator::fake_user(0, 2)])?;
            let base = generator::base_date();

            // First batch commits
            store.insert_posts(&[generator::fake_post(0, ids[0], base)])?;

            // Second batch hits the username uniqueness constraint
            let user = generator::fake_user(0, 2);
            store.insert_users(&[user])?;
            Ok(())
        });

        assert!(matches!(result, Err(SeedError::Storage(_))));
        assert_eq!(synchronous_level(&store), 2);

        let posts: i64 = store
            .raw()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .expect("count posts");
        assert_eq!(posts, 1, "committed first batch must survive the failure");
    }

    #[test]
    fn test_post_timestamps_round_trip_through_store() {
        let (_dir, _db, mut store) = file_backed_store();

        let ids = store
            .insert_users(&[generator::fake_user(0, 1)])
            .expect("insert user");
        let base = generator::base_date();
        let post = generator::fake_post(7, ids[0], base);
        let expected = post.created_at;
        store.insert_posts(&[post]).expect("insert post");

        let stored: String = store
            .raw()
            .query_row("SELECT created_at FROM posts", [], |row| row.get(0))
            .expect("read created_at");
        let parsed = stored
            .parse::<chrono::DateTime<Utc>>()
            .expect("stored timestamp is RFC 3339");
        assert_eq!(parsed, expected);
    }
}
