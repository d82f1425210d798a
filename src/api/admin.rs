use axum::{extract::State, http::HeaderMap};

use super::{success, ApiResult};
use crate::auth::bearer_token;
use crate::models::{AdminPermission, AdminStats};
use crate::AppState;

/// GET /api/admin/stats - Admin dashboard counters.
pub async fn admin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<AdminStats> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ViewAnalytics)
        .await?;

    success(state.repo.admin_stats(&admin.college_id).await?)
}
