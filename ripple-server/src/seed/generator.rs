//! Synthetic row payloads for the bulk generation pipeline.
//!
//! Every payload is a pure function of its integer index: the index seeds an
//! independent RNG, so invocations need no coordination and the same index
//! always produces the same username and email. That keeps the index-salted
//! identifiers unique within a run and makes a re-run over the same index
//! range collide deterministically with the store's uniqueness constraints.

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::en::{FreeEmail, Username};
use fake::faker::lorem::en::Paragraph;
use fake::Fake;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Maximum length of generated post content, in bytes
pub const MAX_CONTENT_LEN: usize = 200;

// Distinct seed streams so user and post draws stay independent
const USER_STREAM: u64 = 0x7573_6572;
const POST_STREAM: u64 = 0x706f_7374;

/// Row payload for a bulk user insert
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub posts_count: i64,
}

/// Row payload for a bulk post insert
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub content: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// Start of the historical window post timestamps are drawn from
pub fn base_date() -> DateTime<Utc> {
    Utc::now() - Duration::days(365)
}

/// Build the user payload for `index`, with the post counter eagerly set to
/// its final value.
pub fn fake_user(index: u64, posts_per_user: u64) -> NewUser {
    let mut rng = StdRng::seed_from_u64(USER_STREAM.wrapping_add(index));

    let username: String = Username().fake_with_rng(&mut rng);
    let email: String = FreeEmail().fake_with_rng(&mut rng);

    NewUser {
        username: format!("user_{index}_{username}"),
        email: format!("user_{index}_{email}"),
        posts_count: posts_per_user as i64,
    }
}

/// Build the post payload for global post `index`, attributed to `user_id`.
///
/// Likes are drawn from `0..=1000` on this bulk path; the interactive create
/// endpoint always starts posts at zero. Timestamps land inside
/// `[base_date, base_date + 365d 23h 59m]`.
pub fn fake_post(index: u64, user_id: i64, base_date: DateTime<Utc>) -> NewPost {
    let mut rng = StdRng::seed_from_u64(POST_STREAM.wrapping_add(index));

    let mut content: String = Paragraph(1..3).fake_with_rng(&mut rng);
    truncate_to(&mut content, MAX_CONTENT_LEN);

    let created_at = base_date
        + Duration::days(rng.random_range(0..=364))
        + Duration::hours(rng.random_range(0..=23))
        + Duration::minutes(rng.random_range(0..=59));

    NewPost {
        user_id,
        content,
        likes: rng.random_range(0..=1000),
        created_at,
    }
}

/// Truncate `s` to at most `max` bytes without splitting a char
fn truncate_to(s: &mut String, max: usize) {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
}
