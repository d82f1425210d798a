//! Form validation.
//!
//! Each validator collects every failing field so the client can mark them inline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    normalize_email, CollegeConfig, CreateCompanyRequest, CreateQuestionRequest,
    RegisterAdminRequest, StudentSignupRequest, UpdateCollegeRequest,
};

/// A validation failure attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors.
#[derive(Debug, Default)]
struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.error(field, message);
        }
    }

    fn in_range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64, message: &str) {
        match value {
            Some(v) if v >= min && v <= max => {}
            _ => self.error(field, message),
        }
    }

    fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(self.errors))
        }
    }
}

/// Validate the add-company form.
pub fn validate_company(request: &CreateCompanyRequest) -> Result<(), AppError> {
    let mut v = Validator::default();

    v.required("name", &request.name, "Company name is required");
    v.required("role", &request.role, "Job role is required");
    v.required("package", &request.package, "Package information is required");

    if request
        .eligible_branches
        .iter()
        .all(|b| b.trim().is_empty())
    {
        v.error(
            "eligibleBranches",
            "Please select at least one eligible branch",
        );
    }

    let deadline = request.application_deadline.trim();
    if deadline.is_empty() {
        v.error("applicationDeadline", "Application deadline is required");
    } else if NaiveDate::parse_from_str(deadline, "%Y-%m-%d").is_err() {
        v.error(
            "applicationDeadline",
            "Application deadline must be a date (YYYY-MM-DD)",
        );
    }

    v.in_range(
        "minCgpa",
        request.min_cgpa,
        0.0,
        10.0,
        "Valid CGPA is required (0-10)",
    );
    v.in_range(
        "minTenth",
        request.min_tenth,
        0.0,
        100.0,
        "Valid 10th percentage is required (0-100)",
    );
    v.in_range(
        "minTwelfth",
        request.min_twelfth,
        0.0,
        100.0,
        "Valid 12th percentage is required (0-100)",
    );

    for (i, round) in request.rounds.iter().enumerate() {
        v.required(
            &format!("rounds[{}].name", i),
            &round.name,
            "Round name is required",
        );
    }

    v.finish()
}

/// Validate the student signup form against the college settings.
pub fn validate_signup(
    request: &StudentSignupRequest,
    college: &CollegeConfig,
) -> Result<(), AppError> {
    let mut v = Validator::default();

    v.required("name", &request.name, "Name is required");
    v.required("rollNumber", &request.roll_number, "Roll number is required");

    if !college.is_student_email(&request.email) {
        v.error(
            "email",
            format!(
                "Please use your {} college email (ending with @{})",
                college.short_name, college.email_domain
            ),
        );
    }

    if request.password.is_empty() {
        v.error("password", "Password is required");
    } else if request.password != request.confirm_password {
        v.error("confirmPassword", "Passwords don't match!");
    }

    v.in_range(
        "tenthMarks",
        request.tenth_marks,
        0.0,
        100.0,
        "10th marks must be between 0 and 100",
    );
    v.in_range(
        "twelfthMarks",
        request.twelfth_marks,
        0.0,
        100.0,
        "12th marks must be between 0 and 100",
    );
    v.in_range(
        "cgpa",
        request.cgpa,
        0.0,
        10.0,
        "CGPA must be between 0 and 10",
    );
    if request.backlogs.is_none() {
        v.error("backlogs", "Number of backlogs is required");
    }

    if !college.has_branch(&request.branch) {
        v.error("branch", "Please select a valid branch");
    }

    v.finish()
}

/// Validate an admin registration against the college's admin list.
pub fn validate_admin_registration(
    request: &RegisterAdminRequest,
    college: &CollegeConfig,
) -> Result<(), AppError> {
    let mut v = Validator::default();

    v.required("name", &request.name, "Name is required");
    if !college.is_admin_email(&request.email) {
        v.error("email", "Email is not on the college's admin list");
    }
    if request.password.is_empty() {
        v.error("password", "Password is required");
    }

    v.finish()
}

/// Validate the add-question form.
pub fn validate_question(request: &CreateQuestionRequest) -> Result<(), AppError> {
    let mut v = Validator::default();

    v.required("companyId", &request.company_id, "Company is required");
    v.required("question", &request.question, "Question text is required");
    if request.year <= 0 {
        v.error("year", "Valid year is required");
    }

    v.finish()
}

/// Validate the college setup form and return the cleaned configuration.
///
/// Blank branches and admin emails are dropped before the emptiness checks.
pub fn validate_college(
    request: UpdateCollegeRequest,
    id: &str,
) -> Result<CollegeConfig, AppError> {
    let mut v = Validator::default();

    v.required("name", &request.name, "College name is required");
    v.required("shortName", &request.short_name, "College short name is required");
    v.required(
        "emailDomain",
        &request.email_domain,
        "Email domain is required (e.g., student.college.edu)",
    );
    v.required(
        "placementCell.coordinatorName",
        &request.placement_cell.coordinator_name,
        "Placement coordinator name is required",
    );
    v.required(
        "placementCell.email",
        &request.placement_cell.email,
        "Placement cell email is required",
    );

    let branches: Vec<String> = request
        .branches
        .iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();
    if branches.is_empty() {
        v.error("branches", "At least one branch is required");
    }

    let admin_emails: Vec<String> = request
        .admin_emails
        .iter()
        .map(|e| normalize_email(e))
        .filter(|e| !e.is_empty())
        .collect();
    if admin_emails.is_empty() {
        v.error("adminEmails", "At least one admin email is required");
    }

    v.finish()?;

    Ok(CollegeConfig {
        id: id.to_string(),
        name: request.name.trim().to_string(),
        short_name: request.short_name.trim().to_string(),
        logo: request.logo,
        email_domain: request
            .email_domain
            .trim()
            .trim_start_matches('@')
            .to_lowercase(),
        admin_emails,
        address: request.address,
        website: request.website,
        theme: request.theme,
        placement_cell: request.placement_cell,
        branches,
        active_year: request.active_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyStatus, CreateRoundRequest, PlacementCell, Priority, RoundType};

    fn company_request() -> CreateCompanyRequest {
        CreateCompanyRequest {
            name: "Google".to_string(),
            role: "Software Engineer".to_string(),
            package: "25-30 LPA".to_string(),
            location: "Bangalore".to_string(),
            description: String::new(),
            website: None,
            visit_date: None,
            application_deadline: "2024-02-15".to_string(),
            interview_dates: None,
            status: CompanyStatus::Upcoming,
            priority: Priority::High,
            min_cgpa: Some(7.5),
            min_tenth: Some(80.0),
            min_twelfth: Some(80.0),
            max_backlogs: 0,
            eligible_branches: vec!["Computer Science Engineering".to_string()],
            special_requirements: None,
            rounds: vec![CreateRoundRequest {
                name: "Online Coding Test".to_string(),
                round_type: RoundType::OnlineTest,
                duration: "90 minutes".to_string(),
                description: String::new(),
                topics: vec!["Arrays".to_string()],
                is_elimination: true,
            }],
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::InvalidFields(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_valid_company() {
        assert!(validate_company(&company_request()).is_ok());
    }

    #[test]
    fn test_company_reports_every_invalid_field() {
        let request = CreateCompanyRequest {
            name: "  ".to_string(),
            package: String::new(),
            eligible_branches: Vec::new(),
            application_deadline: "next week".to_string(),
            min_cgpa: Some(11.0),
            min_tenth: None,
            min_twelfth: Some(-1.0),
            ..company_request()
        };

        assert_eq!(
            fields(validate_company(&request).unwrap_err()),
            vec![
                "name",
                "package",
                "eligibleBranches",
                "applicationDeadline",
                "minCgpa",
                "minTenth",
                "minTwelfth",
            ]
        );
    }

    #[test]
    fn test_company_round_needs_name() {
        let mut request = company_request();
        request.rounds[0].name = String::new();
        assert_eq!(
            fields(validate_company(&request).unwrap_err()),
            vec!["rounds[0].name"]
        );
    }

    fn signup_request() -> StudentSignupRequest {
        StudentSignupRequest {
            name: "Jane Doe".to_string(),
            email: "jane@student.college.edu".to_string(),
            roll_number: "CS2021001".to_string(),
            password: "secret-pass".to_string(),
            confirm_password: "secret-pass".to_string(),
            branch: "Computer Science Engineering".to_string(),
            semester: "7".to_string(),
            tenth_marks: Some(88.5),
            twelfth_marks: Some(91.2),
            cgpa: Some(8.7),
            backlogs: Some(0),
        }
    }

    #[test]
    fn test_signup_rules() {
        let college = CollegeConfig::default();
        assert!(validate_signup(&signup_request(), &college).is_ok());

        let request = StudentSignupRequest {
            email: "jane@gmail.com".to_string(),
            confirm_password: "other".to_string(),
            cgpa: Some(10.5),
            branch: "Astrology".to_string(),
            ..signup_request()
        };
        assert_eq!(
            fields(validate_signup(&request, &college).unwrap_err()),
            vec!["email", "confirmPassword", "cgpa", "branch"]
        );
    }

    #[test]
    fn test_signup_requires_backlogs() {
        let college = CollegeConfig::default();
        let request = StudentSignupRequest {
            backlogs: None,
            ..signup_request()
        };
        assert_eq!(
            fields(validate_signup(&request, &college).unwrap_err()),
            vec!["backlogs"]
        );
    }

    #[test]
    fn test_signup_email_message_names_domain() {
        let college = CollegeConfig::default();
        let request = StudentSignupRequest {
            email: "jane@gmail.com".to_string(),
            ..signup_request()
        };
        let err = validate_signup(&request, &college).unwrap_err();
        assert_eq!(
            err.message(),
            "Please use your YCN college email (ending with @student.college.edu)"
        );
    }

    fn college_request() -> UpdateCollegeRequest {
        let college = CollegeConfig::default();
        UpdateCollegeRequest {
            name: "Test Institute".to_string(),
            short_name: "TI".to_string(),
            logo: None,
            email_domain: "@Students.Test.edu".to_string(),
            admin_emails: vec![" Dean@Test.edu ".to_string(), "  ".to_string()],
            address: String::new(),
            website: None,
            theme: college.theme,
            placement_cell: PlacementCell {
                email: "tpo@test.edu".to_string(),
                phone: String::new(),
                coordinator_name: "Dr. T".to_string(),
            },
            branches: vec!["CSE".to_string(), " ".to_string(), " ECE ".to_string()],
            active_year: 2025,
        }
    }

    #[test]
    fn test_college_is_cleaned() {
        let config = validate_college(college_request(), "college-001").unwrap();
        assert_eq!(config.id, "college-001");
        assert_eq!(config.email_domain, "students.test.edu");
        assert_eq!(config.admin_emails, vec!["dean@test.edu"]);
        assert_eq!(config.branches, vec!["CSE", "ECE"]);
    }

    #[test]
    fn test_college_requires_branches_and_admins() {
        let request = UpdateCollegeRequest {
            branches: vec!["".to_string()],
            admin_emails: Vec::new(),
            email_domain: " ".to_string(),
            ..college_request()
        };
        assert_eq!(
            fields(validate_college(request, "college-001").unwrap_err()),
            vec!["emailDomain", "branches", "adminEmails"]
        );
    }
}
