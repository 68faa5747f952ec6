pub mod auth;
pub mod bids;
pub mod catalog;
pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Protected routes
        .route("/auth/user", get(auth::get_auth_user))
        .route("/catalog-items", get(catalog::list_catalog_items))
        // Bids
        .route("/bids", get(bids::list_bids))
        .route("/bids", post(bids::create_bid))
        .route("/bids/:id", get(bids::get_bid))
        .route("/bids/:id", patch(bids::update_bid))
        .route("/bids/:id", delete(bids::delete_bid))
        // Bid items (flat lookup by owning bid, as the client consumes them)
        .route("/bid-items/:bid_id", get(bids::get_bid_items))
}
