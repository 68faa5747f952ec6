//! Bid repository
//!
//! Durable, owner-scoped CRUD for `Bid` plus dependent `BidItem` rows over
//! a PostgreSQL pool. Multi-row writes (bid-with-items insert, cascading
//! delete) run inside a single transaction: either everything commits or
//! nothing does, so a concurrent reader never observes a partial bid.
//!
//! Every single-bid operation takes the caller's `user_id` and treats a
//! foreign owner's bid as absent rather than forbidden.

#![allow(dead_code)]

use sqlx::error::ErrorKind;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Bid, BidItem, BidPatch, NewBid, NewBidItem, UpsertUser, User};
use crate::error::ApiError;

/// Storage error taxonomy, independent of the HTTP layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("storage unavailable")]
    Unavailable(#[source] sqlx::Error),

    #[error("storage failure")]
    Other(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) =>
            {
                Self::Constraint(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err)
            }
            other => Self::Other(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::not_found("Bid not found"),
            StoreError::Constraint(msg) => ApiError::Conflict(msg),
            StoreError::Unavailable(_) => {
                ApiError::ServiceUnavailable("Storage temporarily unavailable".to_string())
            }
            StoreError::Other(e) => ApiError::Database(e),
        }
    }
}

const BID_COLUMNS: &str =
    "id, user_id, client_name, project_location, date, subtotal, materials, labor, overhead, total, created_at";

const BID_ITEM_COLUMNS: &str = "id, bid_id, name, unit_price, quantity, total";

/// Owner-scoped store for bids, bid items and user profiles
#[derive(Clone)]
pub struct BidStore {
    pool: PgPool,
}

impl BidStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // User operations

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert-or-update by primary key, keeping profile fields fresh
    pub async fn upsert_user(&self, user: &UpsertUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = NOW()
            RETURNING id, email, first_name, last_name, profile_image_url, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    // Bid operations

    /// Insert a bid without items; identity and creation timestamp are
    /// assigned by the database
    pub async fn create_bid(&self, bid: &NewBid) -> Result<Bid, StoreError> {
        let bid = Self::insert_bid(bid, &self.pool).await?;
        Ok(bid)
    }

    /// Insert a bid and its items as one transaction
    ///
    /// If any item insert fails, the bid row rolls back with it; a partial
    /// bid is never observable.
    pub async fn create_bid_with_items(
        &self,
        bid: &NewBid,
        items: &[NewBidItem],
    ) -> Result<Bid, StoreError> {
        let mut tx = self.pool.begin().await?;

        let bid = Self::insert_bid(bid, &mut *tx).await?;
        for item in items {
            sqlx::query(
                "INSERT INTO bid_items (bid_id, name, unit_price, quantity, total)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(bid.id)
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(bid)
    }

    pub async fn get_bid(&self, user_id: Uuid, id: i64) -> Result<Option<Bid>, StoreError> {
        let bid = sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bid)
    }

    /// All bids owned by `user_id`, oldest first
    pub async fn get_all_bids(&self, user_id: Uuid) -> Result<Vec<Bid>, StoreError> {
        let bids = sqlx::query_as::<_, Bid>(&format!(
            "SELECT {BID_COLUMNS} FROM bids WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bids)
    }

    /// Items for a bid; empty when the bid has none. Ownership of the bid is
    /// the caller's concern (`get_bid` first).
    pub async fn get_bid_items(&self, bid_id: i64) -> Result<Vec<BidItem>, StoreError> {
        let items = sqlx::query_as::<_, BidItem>(&format!(
            "SELECT {BID_ITEM_COLUMNS} FROM bid_items WHERE bid_id = $1 ORDER BY id ASC"
        ))
        .bind(bid_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Merge only the supplied fields into the bid row
    ///
    /// Omitted fields keep their stored values. Monetary invariants are not
    /// re-checked here; the engine guarantees them before a write.
    pub async fn update_bid(
        &self,
        user_id: Uuid,
        id: i64,
        patch: &BidPatch,
    ) -> Result<Option<Bid>, StoreError> {
        let bid = sqlx::query_as::<_, Bid>(&format!(
            r#"
            UPDATE bids SET
                client_name = COALESCE($3, client_name),
                project_location = COALESCE($4, project_location),
                date = COALESCE($5, date),
                subtotal = COALESCE($6, subtotal),
                materials = COALESCE($7, materials),
                labor = COALESCE($8, labor),
                overhead = COALESCE($9, overhead),
                total = COALESCE($10, total)
            WHERE id = $1 AND user_id = $2
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&patch.client_name)
        .bind(&patch.project_location)
        .bind(&patch.date)
        .bind(patch.subtotal)
        .bind(patch.materials)
        .bind(patch.labor)
        .bind(patch.overhead)
        .bind(patch.total)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bid)
    }

    /// Cascade delete: items first, then the bid, in one transaction
    ///
    /// Returns whether the bid existed. A crash mid-delete leaves neither
    /// dangling items nor a half-deleted bid.
    pub async fn delete_bid(&self, user_id: Uuid, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<i64> =
            sqlx::query_scalar("SELECT id FROM bids WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owned.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM bid_items WHERE bid_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM bids WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Bulk-remove all items for a bid; returns whether any rows went away.
    /// Used by future replace-all-items flows; `delete_bid` carries its own
    /// item delete so the cascade stays inside one transaction.
    pub async fn delete_bid_items(&self, bid_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bid_items WHERE bid_id = $1")
            .bind(bid_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_bid<'e, E>(bid: &NewBid, executor: E) -> Result<Bid, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            INSERT INTO bids (user_id, client_name, project_location, date,
                              subtotal, materials, labor, overhead, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(bid.user_id)
        .bind(&bid.client_name)
        .bind(&bid.project_location)
        .bind(&bid.date)
        .bind(bid.subtotal)
        .bind(bid.materials)
        .bind(bid.labor)
        .bind(bid.overhead)
        .bind(bid.total)
        .fetch_one(executor)
        .await
    }
}
