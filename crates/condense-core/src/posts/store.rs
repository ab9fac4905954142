//! Saved post history

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A generated post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub topic: String,
    pub body: String,
    /// Model that wrote the post, when known
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persists generated posts in the `posts` table
#[derive(Debug, Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a post, returning it with its new id and timestamp
    pub async fn save(&self, topic: &str, body: &str, model: Option<&str>) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            topic: topic.trim().to_string(),
            body: body.to_string(),
            model: model.map(str::to_string),
            // stored with microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query("INSERT INTO posts (id, topic, body, model, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&post.id)
            .bind(&post.topic)
            .bind(&post.body)
            .bind(&post.model)
            .bind(format_timestamp(&post.created_at))
            .execute(&self.pool)
            .await?;

        info!(post_id = %post.id, topic = %post.topic, "Post saved");
        Ok(post)
    }

    /// Most recent posts first, at most `limit`
    pub async fn history(&self, limit: usize) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            "SELECT id, topic, body, model, created_at FROM posts \
             ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PostRow::into_post).collect()
    }

    /// Fetch one post; an unknown id is [`Error::PostNotFound`]
    pub async fn get(&self, id: &str) -> Result<Post> {
        let row: Option<PostRow> =
            sqlx::query_as("SELECT id, topic, body, model, created_at FROM posts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| Error::PostNotFound(id.to_string()))?
            .into_post()
    }

    pub async fn count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

// fixed width keeps lexical order equal to chronological order
fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: String,
    topic: String,
    body: String,
    model: Option<String>,
    created_at: String,
}

impl PostRow {
    fn into_post(self) -> Result<Post> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| Error::Other(format!("Invalid timestamp on post {}: {}", self.id, e)))?
            .with_timezone(&Utc);

        Ok(Post {
            id: self.id,
            topic: self.topic,
            body: self.body,
            model: self.model,
            created_at,
        })
    }
}
