use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Denormalized count of posts authored by this user
    pub posts_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub likes: i64,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// A user together with their most recent posts (for the user listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithPosts {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub posts_count: i64,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub user_id: i64,
    pub content: String,
}

/// Result of a bulk test-data generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub message: String,
    pub total_posts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn post_created_at_serializes_as_rfc3339() {
        let post = Post {
            id: 1,
            user_id: 7,
            content: "hello".to_string(),
            likes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(&post).expect("serialize post");
        assert_eq!(json["created_at"], "2024-03-01T12:30:00+00:00");

        let back: Post = serde_json::from_value(json).expect("deserialize post");
        assert_eq!(back.created_at, post.created_at);
    }

    #[test]
    fn error_response_details_are_optional() {
        let err: ErrorResponse =
            serde_json::from_str(r#"{"error":"Internal Server Error"}"#).expect("deserialize");
        assert_eq!(err.error, "Internal Server Error");
        assert!(err.details.is_none());
    }
}
