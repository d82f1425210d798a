//! Company, selection round and eligibility models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Question;
use crate::eligibility::Criterion;

/// Academic thresholds a student must meet to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    /// Minimum CGPA on a 0-10 scale
    pub cgpa: f64,
    /// Minimum 10th percentage
    pub tenth: f64,
    /// Minimum 12th percentage
    pub twelfth: f64,
    /// Maximum number of active backlogs
    pub backlogs: u32,
    pub branches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

/// Recruitment status of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Upcoming,
    Open,
    Closed,
    Postponed,
    Cancelled,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Upcoming => "upcoming",
            CompanyStatus::Open => "open",
            CompanyStatus::Closed => "closed",
            CompanyStatus::Postponed => "postponed",
            CompanyStatus::Cancelled => "cancelled",
        }
    }

    /// Upcoming and open companies still accept students.
    pub fn is_active(&self) -> bool {
        matches!(self, CompanyStatus::Upcoming | CompanyStatus::Open)
    }
}

impl FromStr for CompanyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(CompanyStatus::Upcoming),
            "open" => Ok(CompanyStatus::Open),
            "closed" => Ok(CompanyStatus::Closed),
            "postponed" => Ok(CompanyStatus::Postponed),
            "cancelled" => Ok(CompanyStatus::Cancelled),
            other => Err(format!("Unknown company status: {}", other)),
        }
    }
}

/// How strongly the placement cell recommends a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// Kind of selection round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    #[default]
    OnlineTest,
    TechnicalInterview,
    HrInterview,
    GroupDiscussion,
    AptitudeTest,
}

impl RoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::OnlineTest => "online_test",
            RoundType::TechnicalInterview => "technical_interview",
            RoundType::HrInterview => "hr_interview",
            RoundType::GroupDiscussion => "group_discussion",
            RoundType::AptitudeTest => "aptitude_test",
        }
    }
}

impl FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online_test" => Ok(RoundType::OnlineTest),
            "technical_interview" => Ok(RoundType::TechnicalInterview),
            "hr_interview" => Ok(RoundType::HrInterview),
            "group_discussion" => Ok(RoundType::GroupDiscussion),
            "aptitude_test" => Ok(RoundType::AptitudeTest),
            other => Err(format!("Unknown round type: {}", other)),
        }
    }
}

/// One stage of a company's selection process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub round_type: RoundType,
    pub duration: String,
    pub description: String,
    pub topics: Vec<String>,
    pub is_elimination: bool,
    /// Position in the selection process, starting at 1
    pub order: i32,
}

/// A recruiting company visiting the college.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub college_id: String,
    pub name: String,
    pub role: String,
    pub package: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    pub application_deadline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_dates: Option<String>,
    pub status: CompanyStatus,
    pub priority: Priority,
    pub eligibility: Eligibility,
    pub rounds: Vec<Round>,
    pub added_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Round as submitted with the add-company form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundRequest {
    pub name: String,
    #[serde(default, rename = "type")]
    pub round_type: RoundType,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_elimination")]
    pub is_elimination: bool,
}

fn default_elimination() -> bool {
    true
}

/// Request body of the add-company form.
///
/// Numeric thresholds are optional here so that a missing value is reported as a
/// field error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub visit_date: Option<String>,
    #[serde(default)]
    pub application_deadline: String,
    #[serde(default)]
    pub interview_dates: Option<String>,
    #[serde(default)]
    pub status: CompanyStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub min_cgpa: Option<f64>,
    #[serde(default)]
    pub min_tenth: Option<f64>,
    #[serde(default)]
    pub min_twelfth: Option<f64>,
    #[serde(default)]
    pub max_backlogs: u32,
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub rounds: Vec<CreateRoundRequest>,
}

/// Request body for changing a company's status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompanyStatusRequest {
    pub status: CompanyStatus,
}

/// A company as seen by a particular viewer.
///
/// Eligibility fields are only present when the viewer is a student.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyView {
    #[serde(flatten)]
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_eligible: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmet_criteria: Vec<Criterion>,
}

impl CompanyView {
    pub fn is_eligible(&self) -> bool {
        self.is_eligible.unwrap_or(false)
    }
}

/// Company detail page: the company, its eligibility for the viewer and sample questions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub view: CompanyView,
    pub sample_questions: Vec<Question>,
}
