use std::collections::HashMap;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::models::{CandidateCourse, Course, Review, SentimentAnalysis, User};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL repository for users, courses, and reviews
///
/// The recommendation core only reads through this client; the single write
/// path used by scoring-adjacent code is review creation, which persists the
/// sentiment analysis alongside the review.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new client and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    // ---- users ----

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        handicap: Option<f64>,
        playing_style: Option<&str>,
    ) -> Result<User, PostgresError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, handicap, playing_style)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, handicap, playing_style, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(handicap)
        .bind(playing_style)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, handicap, playing_style, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| user_from_row(&r))
            .ok_or_else(|| PostgresError::NotFound(format!("User {} not found", user_id)))
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, handicap, playing_style, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, handicap, playing_style, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    /// Persist profile fields edited through the API
    pub async fn save_profile(&self, user: &User) -> Result<(), PostgresError> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2,
                email = $3,
                password_hash = $4,
                handicap = $5,
                playing_style = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.handicap)
        .bind(&user.playing_style)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ---- courses ----

    pub async fn list_courses(&self) -> Result<Vec<Course>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, location, difficulty_rating, description, price_range,
                   vibe_tags, features, current_conditions, last_condition_update
            FROM courses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(course_from_row).collect())
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Course, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, location, difficulty_rating, description, price_range,
                   vibe_tags, features, current_conditions, last_condition_update
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| course_from_row(&r))
            .ok_or_else(|| PostgresError::NotFound(format!("Course {} not found", course_id)))
    }

    /// Load the whole candidate catalog with per-course review history
    ///
    /// Candidate order follows the course listing order (by id), which fixes
    /// the tie-break order of equal recommendation scores.
    pub async fn load_candidates(&self) -> Result<Vec<CandidateCourse>, PostgresError> {
        let courses = self.list_courses().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, course_id, rating, comment, sentiment_score,
                   extracted_features, created_at
            FROM reviews
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_course: HashMap<i64, Vec<Review>> = HashMap::new();
        for row in &rows {
            let review = review_from_row(row);
            by_course.entry(review.course_id).or_default().push(review);
        }

        Ok(courses
            .into_iter()
            .map(|course| {
                let reviews = by_course.remove(&course.id).unwrap_or_default();
                CandidateCourse { course, reviews }
            })
            .collect())
    }

    // ---- reviews ----

    pub async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<Review>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, course_id, rating, comment, sentiment_score,
                   extracted_features, created_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(review_from_row).collect())
    }

    pub async fn reviews_by_course(&self, course_id: i64) -> Result<Vec<Review>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, course_id, rating, comment, sentiment_score,
                   extracted_features, created_at
            FROM reviews
            WHERE course_id = $1
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(review_from_row).collect())
    }

    /// Insert a review together with its sentiment analysis
    pub async fn create_review(
        &self,
        user_id: i64,
        course_id: i64,
        rating: i32,
        comment: &str,
        sentiment: &SentimentAnalysis,
    ) -> Result<Review, PostgresError> {
        let features = serde_json::to_value(&sentiment.features).unwrap_or_default();

        let row = sqlx::query(
            r#"
            INSERT INTO reviews (user_id, course_id, rating, comment, sentiment_score, extracted_features)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, course_id, rating, comment, sentiment_score,
                      extracted_features, created_at
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(rating)
        .bind(comment)
        .bind(sentiment.sentiment_score)
        .bind(features)
        .fetch_one(&self.pool)
        .await?;

        Ok(review_from_row(&row))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        handicap: row.get("handicap"),
        playing_style: row.get("playing_style"),
        created_at: row.get("created_at"),
    }
}

fn course_from_row(row: &PgRow) -> Course {
    Course {
        id: row.get("id"),
        name: row.get("name"),
        location: row.get("location"),
        difficulty_rating: row.get("difficulty_rating"),
        description: row.get("description"),
        price_range: row.get("price_range"),
        vibe_tags: json_list(row.get("vibe_tags")),
        features: json_list(row.get("features")),
        current_conditions: row
            .get::<Option<serde_json::Value>, _>("current_conditions")
            .and_then(|value| serde_json::from_value(value).ok()),
        last_condition_update: row.get("last_condition_update"),
    }
}

fn review_from_row(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        user_id: row.get("user_id"),
        course_id: row.get("course_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        sentiment_score: row.get("sentiment_score"),
        extracted_features: json_list(row.get("extracted_features")),
        created_at: row.get("created_at"),
    }
}

/// Decode a JSONB string array column, tolerating NULL and bad shapes
fn json_list(value: Option<serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}
