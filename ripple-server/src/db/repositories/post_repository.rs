use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use ripple_types::Post;

use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post; likes start at zero on this path
    pub fn create(&self, user_id: i64, content: &str, created_at: DateTime<Utc>) -> Result<Post> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (user_id, content, likes, created_at) VALUES (?, ?, 0, ?)",
            (user_id, content, created_at.to_rfc3339()),
        )
        .context("Failed to create post")?;

        Ok(Post {
            id: conn.last_insert_rowid(),
            user_id,
            content: content.to_string(),
            likes: 0,
            created_at,
        })
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, likes, created_at
             FROM posts
             WHERE id = ?",
        )?;

        let post = stmt
            .query_row([post_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    content: row.get(2)?,
                    likes: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(post)
    }

    /// Atomically increment the like counter; returns the new count,
    /// or None if the post does not exist
    pub fn like(&self, post_id: i64) -> Result<Option<i64>> {
        let conn = self.pool.get()?;
        let changed = conn
            .execute("UPDATE posts SET likes = likes + 1 WHERE id = ?", [post_id])
            .context("Failed to like post")?;
        if changed == 0 {
            return Ok(None);
        }

        let likes: i64 =
            conn.query_row("SELECT likes FROM posts WHERE id = ?", [post_id], |row| {
                row.get(0)
            })?;
        Ok(Some(likes))
    }

    /// Get a page of the global feed, newest first
    pub fn feed(&self, skip: i64, limit: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, likes, created_at
             FROM posts
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?",
        )?;

        let posts = stmt
            .query_map([limit, skip], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    content: row.get(2)?,
                    likes: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get the most recent posts by a specific user
    pub fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, content, likes, created_at
             FROM posts
             WHERE user_id = ?
             ORDER BY created_at DESC
             LIMIT ?",
        )?;

        let posts = stmt
            .query_map([user_id, limit], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    content: row.get(2)?,
                    likes: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Count posts authored by a user
    pub fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::UserRepository;
    use crate::db::Database;

    fn seeded_db() -> (Database, i64) {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        let users = UserRepository::new(db.pool.clone());
        let user = users.create("dave", "dave@example.com").expect("create user");
        (db, user.id)
    }

    #[test]
    fn test_create_and_like_post() {
        let (db, user_id) = seeded_db();
        let repo = PostRepository::new(db.pool.clone());

        let post = repo
            .create(user_id, "first!", Utc::now())
            .expect("create post");
        assert_eq!(post.likes, 0);

        let likes = repo.like(post.id).expect("like").expect("post exists");
        assert_eq!(likes, 1);
        let likes = repo.like(post.id).expect("like").expect("post exists");
        assert_eq!(likes, 2);

        // Liking a missing post reports None rather than failing
        assert!(repo.like(post.id + 1000).expect("like").is_none());
    }

    #[test]
    fn test_feed_is_newest_first_and_paginated() {
        let (db, user_id) = seeded_db();
        let repo = PostRepository::new(db.pool.clone());

        let base = Utc::now();
        for i in 0..5 {
            repo.create(
                user_id,
                &format!("post {i}"),
                base - chrono::Duration::minutes(i),
            )
            .expect("create post");
        }

        let page = repo.feed(0, 2).expect("feed");
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].content, "post 0");
        assert_eq!(page[1].content, "post 1");

        let next = repo.feed(2, 2).expect("feed");
        assert_eq!(next[0].content, "post 2");
        assert_eq!(next[1].content, "post 3");
    }

    #[test]
    fn test_count_for_user() {
        let (db, user_id) = seeded_db();
        let repo = PostRepository::new(db.pool.clone());

        assert_eq!(repo.count_for_user(user_id).expect("count"), 0);
        repo.create(user_id, "a", Utc::now()).expect("create");
        repo.create(user_id, "b", Utc::now()).expect("create");
        assert_eq!(repo.count_for_user(user_id).expect("count"), 2);
    }
}
