//! Student roster endpoint.

use axum::{extract::State, http::HeaderMap};

use super::{success, ApiResult};
use crate::auth::bearer_token;
use crate::models::{AdminPermission, User};
use crate::AppState;

/// GET /api/students - Registered students of the college.
pub async fn list_students(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<User>> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageStudents)
        .await?;

    success(state.repo.list_students(&admin.college_id).await?)
}
