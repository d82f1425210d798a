//! College settings endpoints.

use axum::{extract::State, http::HeaderMap, Json};

use super::{success, ApiResult};
use crate::auth::bearer_token;
use crate::models::{AdminPermission, CollegeConfig, UpdateCollegeRequest};
use crate::validation::validate_college;
use crate::AppState;

/// GET /api/college - Active college configuration.
pub async fn get_college(State(state): State<AppState>) -> ApiResult<CollegeConfig> {
    success(state.college.get().await)
}

/// PUT /api/college - Replace the college configuration.
pub async fn update_college(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateCollegeRequest>,
) -> ApiResult<CollegeConfig> {
    state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageSettings)
        .await?;

    let current = state.college.get().await;
    let config = validate_college(request, &current.id)?;

    success(state.college.update(config).await?)
}
