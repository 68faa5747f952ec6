//! Bid routes
//!
//! CRUD over saved estimates. The estimation engine derives and validates
//! the monetary fields before anything is written; the store guarantees the
//! multi-row writes are atomic. Every operation is scoped to the
//! authenticated owner, and another owner's bid reads as absent.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::{Bid, BidItem, BidPatch, SaveBidRequest};
use crate::error::{ApiError, ApiResult};
use crate::estimate;

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// GET /api/bids
///
/// All bids owned by the caller, oldest first.
pub async fn list_bids(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Bid>>> {
    let bids = state.store.get_all_bids(auth.user_id).await?;
    Ok(Json(bids))
}

/// GET /api/bids/:id
pub async fn get_bid(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Bid>> {
    let bid = state
        .store
        .get_bid(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bid not found"))?;
    Ok(Json(bid))
}

/// GET /api/bid-items/:bid_id
///
/// Items for an owned bid; an empty array when the bid has none.
pub async fn get_bid_items(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(bid_id): Path<i64>,
) -> ApiResult<Json<Vec<BidItem>>> {
    state
        .store
        .get_bid(auth.user_id, bid_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bid not found"))?;

    let items = state.store.get_bid_items(bid_id).await?;
    Ok(Json(items))
}

/// POST /api/bids
///
/// Validate and derive the estimate, then persist the bid and its items in
/// one transaction.
pub async fn create_bid(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveBidRequest>,
) -> ApiResult<impl IntoResponse> {
    let (new_bid, items) = estimate::to_save_payload(auth.user_id, &request)?;

    tracing::info!(
        user_id = %auth.user_id,
        client_name = %new_bid.client_name,
        total = %new_bid.total,
        item_count = items.len(),
        "Creating bid"
    );

    let bid = state.store.create_bid_with_items(&new_bid, &items).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// PATCH /api/bids/:id
///
/// Merge only the supplied fields; everything omitted stays as stored.
pub async fn update_bid(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<BidPatch>,
) -> ApiResult<Json<Bid>> {
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let bid = state
        .store
        .update_bid(auth.user_id, id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Bid not found"))?;

    tracing::info!(user_id = %auth.user_id, bid_id = id, "Updated bid");
    Ok(Json(bid))
}

/// DELETE /api/bids/:id
///
/// Cascade delete of the bid and its items, atomically.
pub async fn delete_bid(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state.store.delete_bid(auth.user_id, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Bid not found"));
    }

    tracing::info!(user_id = %auth.user_id, bid_id = id, "Deleted bid");
    Ok(Json(DeletedResponse {
        message: "Bid deleted successfully".to_string(),
    }))
}
