//! Dashboard summary models.

use serde::Serialize;

use super::{CompanyView, StudentProfile};

/// Counters shown at the top of the student dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_companies: usize,
    pub eligible_companies: usize,
    pub high_priority_companies: usize,
    pub upcoming_companies: usize,
}

/// Student dashboard: profile, counters and the filtered company list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub profile: StudentProfile,
    pub stats: StudentStats,
    pub companies: Vec<CompanyView>,
}

/// Number of companies in one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_companies: i64,
    pub active_companies: i64,
    pub total_students: i64,
    pub questions_bank: i64,
    pub companies_by_status: Vec<StatusCount>,
}
