//! REST API module.
//!
//! One handler per portal page action. Handlers resolve the caller's session
//! first, then act on the active college.

mod admin;
mod auth;
mod college;
mod companies;
mod dashboard;
mod questions;
mod students;

pub use admin::*;
pub use auth::*;
pub use college::*;
pub use companies::*;
pub use dashboard::*;
pub use questions::*;
pub use students::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::eligibility::{evaluate, AcademicProfile, BranchPolicy};
use crate::errors::AppError;
use crate::models::{Company, CompanyView, User};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Attach the viewer's eligibility to a company. Admins see the company as is.
fn company_view(viewer: &User, company: Company, policy: BranchPolicy) -> CompanyView {
    match viewer.student_profile() {
        Some(profile) => {
            let report = evaluate(&AcademicProfile::from(profile), &company.eligibility, policy);
            CompanyView {
                company,
                is_eligible: Some(report.eligible),
                unmet_criteria: report.unmet,
            }
        }
        None => CompanyView {
            company,
            is_eligible: None,
            unmet_criteria: Vec::new(),
        },
    }
}
