//! Question bank endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::filter::{facets, filter_questions, QuestionFacets, QuestionFilter, QuestionQuery};
use crate::models::{AdminPermission, CreateQuestionRequest, Question};
use crate::validation::validate_question;
use crate::AppState;

/// Filtered question bank with the dropdown values of the whole bank.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBank {
    pub questions: Vec<Question>,
    pub total: usize,
    pub facets: QuestionFacets,
}

/// GET /api/questions - Filter the question bank.
pub async fn list_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<QuestionQuery>,
) -> ApiResult<QuestionBank> {
    let user = state.sessions.authenticate(bearer_token(&headers)).await?;
    let filter = QuestionFilter::try_from(query)?;

    let all = state.repo.list_questions(&user.college_id).await?;
    let questions: Vec<Question> = filter_questions(&all, &filter)
        .into_iter()
        .cloned()
        .collect();

    success(QuestionBank {
        total: questions.len(),
        facets: facets(&all),
        questions,
    })
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub question: Question,
    pub score: f32,
}

/// GET /api/questions/search - Ranked full-text search.
pub async fn search_questions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let user = state.sessions.authenticate(bearer_token(&headers)).await?;
    let limit = params.limit.clamp(1, MAX_SEARCH_LIMIT);

    let page = state
        .search
        .search(&user.college_id, &params.q, limit, params.offset)?;

    let mut results = Vec::with_capacity(page.hits.len());
    for hit in page.hits {
        if let Some(question) = state.repo.get_question(&hit.question_id).await? {
            results.push(SearchResultItem {
                question,
                score: hit.score,
            });
        }
    }

    success(SearchResponse {
        results,
        total: page.total,
        limit,
        offset: params.offset,
    })
}

/// POST /api/questions - Add a question to a company.
pub async fn create_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateQuestionRequest>,
) -> ApiResult<Question> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageQuestions)
        .await?;

    validate_question(&request)?;

    let company = state
        .repo
        .get_company(request.company_id.trim())
        .await?
        .filter(|c| c.college_id == admin.college_id)
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", request.company_id)))?;

    let question = state
        .repo
        .create_question(&request, &company, &admin.id)
        .await?;

    if let Err(e) = state.search.index_question(&question).await {
        tracing::warn!("Failed to index question: {}", e);
    }

    success(question)
}

/// DELETE /api/questions/{id} - Remove a question.
pub async fn delete_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let admin = state
        .sessions
        .require_admin(bearer_token(&headers), AdminPermission::ManageQuestions)
        .await?;

    state
        .repo
        .get_question(&id)
        .await?
        .filter(|q| q.college_id == admin.college_id)
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", id)))?;

    state.repo.delete_question(&id).await?;

    if let Err(e) = state.search.remove_questions(&[id]).await {
        tracing::warn!("Failed to remove question from index: {}", e);
    }

    success(())
}
