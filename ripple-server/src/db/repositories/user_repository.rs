use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use ripple_types::User;

use crate::db::DbPool;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user; the store assigns the id
    pub fn create(&self, username: &str, email: &str) -> Result<User> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO users (username, email, posts_count) VALUES (?, ?, 0)",
            (username, email),
        )
        .context("Failed to create user")?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            posts_count: 0,
        })
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, email, posts_count
             FROM users
             WHERE id = ?",
        )?;

        let user = stmt
            .query_row([user_id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    posts_count: row.get(3)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Get a page of users ordered by id
    pub fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, email, posts_count
             FROM users
             ORDER BY id
             LIMIT ? OFFSET ?",
        )?;

        let users = stmt
            .query_map([limit, skip], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    posts_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Atomically bump the denormalized post counter for a user
    pub fn increment_posts_count(&self, user_id: i64) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE users SET posts_count = posts_count + 1 WHERE id = ?",
            [user_id],
        )
        .context("Failed to increment posts_count")?;
        Ok(())
    }
}

/// Whether an error from the repository layer is a SQLite uniqueness
/// violation (duplicate username or email)
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_create_and_fetch_user() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let repo = UserRepository::new(db.pool.clone());

        let created = repo.create("alice", "alice@example.com").expect("create");
        assert!(created.id > 0);
        assert_eq!(created.posts_count, 0);

        let fetched = repo
            .get_by_id(created.id)
            .expect("get_by_id")
            .expect("user exists");
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.email, "alice@example.com");
    }

    #[test]
    fn test_duplicate_username_is_unique_violation() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let repo = UserRepository::new(db.pool.clone());

        repo.create("bob", "bob@example.com").expect("first create");
        let err = repo
            .create("bob", "other@example.com")
            .expect_err("duplicate username must fail");
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_increment_posts_count() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let repo = UserRepository::new(db.pool.clone());

        let user = repo.create("carol", "carol@example.com").expect("create");
        repo.increment_posts_count(user.id).expect("increment");
        repo.increment_posts_count(user.id).expect("increment");

        let fetched = repo.get_by_id(user.id).expect("get").expect("exists");
        assert_eq!(fetched.posts_count, 2);
    }
}
