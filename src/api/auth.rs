//! Signup, login and session endpoints.

use axum::{extract::State, http::HeaderMap, Json};

use super::{success, ApiResult};
use crate::auth::bearer_token;
use crate::models::{
    LoginRequest, LoginResponse, RegisterAdminRequest, Role, SessionInfo, StudentSignupRequest,
    User,
};
use crate::AppState;

/// POST /api/auth/signup - Register a student account.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<StudentSignupRequest>,
) -> ApiResult<User> {
    let college = state.college.get().await;
    success(state.sessions.signup(request, &college).await?)
}

/// POST /api/auth/admins - Register an admin account for a listed email.
pub async fn register_admin(
    State(state): State<AppState>,
    Json(request): Json<RegisterAdminRequest>,
) -> ApiResult<User> {
    let college = state.college.get().await;
    success(state.sessions.register_admin(request, &college).await?)
}

/// POST /api/auth/login - Open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let college = state.college.get().await;
    success(state.sessions.login(request, &college).await?)
}

/// POST /api/auth/logout - Close the current session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    state.sessions.logout(bearer_token(&headers)).await?;
    success(())
}

/// GET /api/auth/session - Current user and college.
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<SessionInfo> {
    let user = state.sessions.authenticate(bearer_token(&headers)).await?;
    let college = state.college.get().await;

    success(SessionInfo {
        is_admin: user.role() == Role::Admin,
        is_student: user.role() == Role::Student,
        user,
        college,
    })
}
