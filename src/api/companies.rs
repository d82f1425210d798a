//! Company API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use super::{company_view, success, ApiResult};
use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::models::{
    AdminPermission, Company, CompanyDetail, CompanyView, CreateCompanyRequest,
    UpdateCompanyStatusRequest, User,
};
use crate::validation::validate_company;
use crate::AppState;

/// Questions shown on a company's detail page.
const SAMPLE_QUESTIONS: usize = 5;

/// GET /api/companies - Companies of the active college.
pub async fn list_companies(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<CompanyView>> {
    let user = state.sessions.authenticate(bearer_token(&headers)).await?;
    let policy = state.config.empty_branches;

    let companies = state.repo.list_companies(&user.college_id).await?;
    success(
        companies
            .into_iter()
            .map(|company| company_view(&user, company, policy))
            .collect(),
    )
}

/// GET /api/companies/{id} - Company details with sample questions.
pub async fn get_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<CompanyDetail> {
    let user = state.sessions.authenticate(bearer_token(&headers)).await?;
    let company = find_company(&state, &user, &id).await?;

    let mut sample_questions = state.repo.list_company_questions(&company.id).await?;
    sample_questions.truncate(SAMPLE_QUESTIONS);

    success(CompanyDetail {
        view: company_view(&user, company, state.config.empty_branches),
        sample_questions,
    })
}

/// POST /api/companies - Add a company with its selection rounds.
pub async fn create_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCompanyRequest>,
) -> ApiResult<Company> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageCompanies)
        .await?;

    validate_company(&request)?;

    let company = state
        .repo
        .create_company(&request, &admin.college_id, &admin.id)
        .await?;
    tracing::info!(
        "Company {} added with {} rounds by {}",
        company.name,
        company.rounds.len(),
        admin.email
    );

    success(company)
}

/// PUT /api/companies/{id}/status - Change a company's status.
pub async fn update_company_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateCompanyStatusRequest>,
) -> ApiResult<Company> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageCompanies)
        .await?;
    find_company(&state, &admin, &id).await?;

    success(state.repo.update_company_status(&id, request.status).await?)
}

/// DELETE /api/companies/{id} - Delete a company with its rounds and questions.
pub async fn delete_company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageCompanies)
        .await?;
    find_company(&state, &admin, &id).await?;

    let question_ids: Vec<String> = state
        .repo
        .list_company_questions(&id)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();

    state.repo.delete_company(&id).await?;

    if let Err(e) = state.search.remove_questions(&question_ids).await {
        tracing::warn!("Failed to remove questions of company {} from index: {}", id, e);
    }

    success(())
}

/// Companies of other colleges are reported as missing.
async fn find_company(state: &AppState, user: &User, id: &str) -> Result<Company, AppError> {
    state
        .repo
        .get_company(id)
        .await?
        .filter(|company| company.college_id == user.college_id)
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))
}
