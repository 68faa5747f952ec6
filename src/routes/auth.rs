//! Auth routes
//!
//! The authentication collaborator owns identity; this endpoint keeps the
//! stored profile fresh from the verified token claims and returns it.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::User;
use crate::error::ApiResult;

/// GET /api/auth/user
///
/// Upsert the caller's profile from token claims and return it.
pub async fn get_auth_user(
    State(state): State<Arc<AppState>>,
    auth: RequireAuth,
) -> ApiResult<Json<User>> {
    let user = state.store.upsert_user(&auth.as_upsert()).await?;
    Ok(Json(user))
}
