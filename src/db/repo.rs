//! Repository layer for database operations.
//!
//! All queries go through sqlx's `Any` driver so the same code serves the
//! embedded SQLite file and a hosted Postgres. Placeholders are `$N` (valid
//! on both backends), booleans are stored as 0/1 integers, and timestamps
//! are RFC 3339 text so ordering by `created_at` is chronological.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use tracing::warn;

use crate::domain::{
    BookingRequest, NewBooking, NewPortfolioItem, PortfolioItem, Session, TattooStyle, UserAccount,
};

/// Repository for database operations.
#[derive(Clone)]
pub struct Repository {
    pool: AnyPool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Repository { pool }
    }

    /// Cheap connectivity check for the readiness endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // Booking operations
    // =========================================================================

    /// Insert a validated booking request. Returns the new row id.
    pub async fn insert_booking(
        &self,
        booking: &NewBooking,
        preferred_date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO booking_requests (
                client_name, email, body_part, idea_description,
                preferred_date, is_confirmed, created_at
            ) VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING id
            "#,
        )
        .bind(booking.client_name.trim())
        .bind(booking.email.trim())
        .bind(booking.body_part.trim())
        .bind(booking.idea_description.trim())
        .bind(preferred_date.format("%Y-%m-%d").to_string())
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// All booking requests, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<BookingRequest>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_name, email, body_part, idea_description,
                   preferred_date, is_confirmed, created_at
            FROM booking_requests
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    pub async fn get_booking(&self, id: i64) -> Result<Option<BookingRequest>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, client_name, email, body_part, idea_description,
                   preferred_date, is_confirmed, created_at
            FROM booking_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(booking_from_row))
    }

    /// Mark a booking confirmed. Returns false when the id does not exist.
    pub async fn confirm_booking(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE booking_requests SET is_confirmed = 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Portfolio operations
    // =========================================================================

    /// Insert a portfolio item. Returns the new row id.
    pub async fn insert_portfolio_item(
        &self,
        item: &NewPortfolioItem,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO portfolio_items (title, description, image_url, style, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(item.title.trim())
        .bind(item.description.trim())
        .bind(item.image_url.trim())
        .bind(item.style_or_default())
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// All portfolio items, newest first.
    pub async fn list_portfolio_items(&self) -> Result<Vec<PortfolioItem>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, image_url, style, created_at
            FROM portfolio_items
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(portfolio_from_row).collect())
    }

    pub async fn get_portfolio_item(&self, id: i64) -> Result<Option<PortfolioItem>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, image_url, style, created_at
            FROM portfolio_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(portfolio_from_row))
    }

    // =========================================================================
    // Role and style lookups
    // =========================================================================

    /// Tattoo styles in seed order.
    pub async fn list_styles(&self) -> Result<Vec<TattooStyle>, sqlx::Error> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM tattoo_styles ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| TattooStyle { id, name })
            .collect())
    }

    pub async fn list_style_names(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM tattoo_styles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn list_role_names(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Persist pending role and style rows in one transaction. Each insert
    /// carries its own conflict guard, so rows created by a concurrent
    /// seeder degrade to no-ops instead of failing the batch. Returns how
    /// many rows were actually inserted.
    pub async fn insert_lookup_batch(
        &self,
        roles: &[String],
        styles: &[String],
    ) -> Result<u64, sqlx::Error> {
        if roles.is_empty() && styles.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0u64;
        let mut tx = self.pool.begin().await?;

        for role in roles {
            let result = sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(role.as_str())
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        for style in styles {
            let result = sqlx::query(
                "INSERT INTO tattoo_styles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            )
            .bind(style.as_str())
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    // =========================================================================
    // User operations
    // =========================================================================

    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create an account and grant it a role, atomically. The role row is
    /// created on the spot if it is not there yet. Returns `None` when a
    /// concurrent writer created the account first; the existing account is
    /// left exactly as it is.
    pub async fn create_user_with_role(
        &self,
        email: &str,
        password_hash: &str,
        role_name: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role_name)
            .execute(&mut *tx)
            .await?;
        let (role_id,): (i64,) = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
            .bind(role_name)
            .fetch_one(&mut *tx)
            .await?;

        let user_row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO users (email, password_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id,)) = user_row else {
            // Lost the insert race. Commit keeps the role row, which is
            // wanted either way, and leaves the winner's account untouched.
            tx.commit().await?;
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(user_id))
    }

    /// Role names granted to a user.
    pub async fn roles_of_user(&self, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    // =========================================================================
    // Session operations
    // =========================================================================

    pub async fn insert_session(&self, session: &Session) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.token.as_str())
        .bind(session.user_id)
        .bind(session.created_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_session(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(|row| Session {
            token: row.get("token"),
            user_id: row.get("user_id"),
            created_at: parse_timestamp(&row.get::<String, _>("created_at"), "sessions.created_at"),
            expires_at: parse_timestamp(&row.get::<String, _>("expires_at"), "sessions.expires_at"),
        }))
    }
}

fn booking_from_row(row: &AnyRow) -> BookingRequest {
    let preferred_date_str: String = row.get("preferred_date");
    let created_at_str: String = row.get("created_at");
    let is_confirmed: i64 = row.get("is_confirmed");

    BookingRequest {
        id: row.get("id"),
        client_name: row.get("client_name"),
        email: row.get("email"),
        body_part: row.get("body_part"),
        idea_description: row.get("idea_description"),
        preferred_date: parse_date(&preferred_date_str, "booking_requests.preferred_date"),
        is_confirmed: is_confirmed != 0,
        created_at: parse_timestamp(&created_at_str, "booking_requests.created_at"),
    }
}

fn portfolio_from_row(row: &AnyRow) -> PortfolioItem {
    let created_at_str: String = row.get("created_at");

    PortfolioItem {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        style: row.get("style"),
        created_at: parse_timestamp(&created_at_str, "portfolio_items.created_at"),
    }
}

fn user_from_row(row: &AnyRow) -> UserAccount {
    let created_at_str: String = row.get("created_at");

    UserAccount {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: parse_timestamp(&created_at_str, "users.created_at"),
    }
}

fn parse_timestamp(raw: &str, column: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = %raw, column = %column, error = %e, "failed to parse stored timestamp, using epoch");
            DateTime::<Utc>::default()
        })
}

fn parse_date(raw: &str, column: &str) -> NaiveDate {
    crate::domain::validation::parse_date(raw).unwrap_or_else(|| {
        warn!(value = %raw, column = %column, "failed to parse stored date, using epoch date");
        NaiveDate::default()
    })
}
