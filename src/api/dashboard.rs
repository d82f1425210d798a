//! Student dashboard endpoint.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

use super::{company_view, success, ApiResult};
use crate::auth::bearer_token;
use crate::errors::AppError;
use crate::filter::{filter_companies, CompanyFilter};
use crate::models::{CompanyView, StudentDashboard, StudentStats};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter: CompanyFilter,
}

/// GET /api/dashboard - The student's profile, counters and filtered companies.
pub async fn student_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<StudentDashboard> {
    let user = state.sessions.require_student(bearer_token(&headers)).await?;
    let profile = user
        .student_profile()
        .cloned()
        .ok_or_else(|| AppError::Forbidden("Student access required".to_string()))?;

    let policy = state.config.empty_branches;
    let views: Vec<CompanyView> = state
        .repo
        .list_companies(&user.college_id)
        .await?
        .into_iter()
        .map(|company| company_view(&user, company, policy))
        .collect();

    let stats = student_stats(&views);

    success(StudentDashboard {
        profile,
        stats,
        companies: filter_companies(views, query.filter),
    })
}

/// Each counter matches the size of the list its quick filter shows.
fn student_stats(views: &[CompanyView]) -> StudentStats {
    let count = |filter: CompanyFilter| views.iter().filter(|v| filter.matches(v)).count();

    StudentStats {
        total_companies: count(CompanyFilter::All),
        eligible_companies: count(CompanyFilter::Eligible),
        high_priority_companies: count(CompanyFilter::HighPriority),
        upcoming_companies: count(CompanyFilter::Upcoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, CompanyStatus, Eligibility, Priority};

    fn view(status: CompanyStatus, priority: Priority, eligible: bool) -> CompanyView {
        CompanyView {
            company: Company {
                id: "c1".to_string(),
                college_id: "college-001".to_string(),
                name: "Acme".to_string(),
                role: "SDE".to_string(),
                package: "10 LPA".to_string(),
                location: String::new(),
                description: String::new(),
                website: None,
                visit_date: None,
                application_deadline: "2024-02-15".to_string(),
                interview_dates: None,
                status,
                priority,
                eligibility: Eligibility {
                    cgpa: 7.0,
                    tenth: 70.0,
                    twelfth: 70.0,
                    backlogs: 0,
                    branches: Vec::new(),
                    special_requirements: None,
                },
                rounds: Vec::new(),
                added_by: "admin".to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
                updated_at: "2024-01-01T00:00:00Z".to_string(),
            },
            is_eligible: Some(eligible),
            unmet_criteria: Vec::new(),
        }
    }

    #[test]
    fn test_stats_agree_with_quick_filters() {
        let views = vec![
            view(CompanyStatus::Upcoming, Priority::High, true),
            view(CompanyStatus::Open, Priority::High, false),
            view(CompanyStatus::Closed, Priority::Medium, true),
            view(CompanyStatus::Cancelled, Priority::High, true),
        ];

        let stats = student_stats(&views);
        assert_eq!(stats.total_companies, 4);
        assert_eq!(stats.eligible_companies, 3);
        assert_eq!(stats.high_priority_companies, 2);
        assert_eq!(stats.upcoming_companies, 2);

        for (filter, counted) in [
            (CompanyFilter::Eligible, stats.eligible_companies),
            (CompanyFilter::HighPriority, stats.high_priority_companies),
            (CompanyFilter::Upcoming, stats.upcoming_companies),
        ] {
            assert_eq!(filter_companies(views.clone(), filter).len(), counted);
        }
    }
}
