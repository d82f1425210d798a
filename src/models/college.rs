//! College configuration model.

use serde::{Deserialize, Serialize};

use super::Role;

/// Theme colors used by the client when rendering the college's pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

/// Contact details of the placement cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementCell {
    pub email: String,
    pub phone: String,
    pub coordinator_name: String,
}

/// College-specific settings: who is an admin, which email domain students use,
/// which branches exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeConfig {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Student email domain without the `@`, e.g. `student.college.edu`
    pub email_domain: String,
    pub admin_emails: Vec<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub theme: Theme,
    pub placement_cell: PlacementCell,
    pub branches: Vec<String>,
    pub active_year: i32,
}

impl Default for CollegeConfig {
    fn default() -> Self {
        Self {
            id: "college-001".to_string(),
            name: "Your College Name".to_string(),
            short_name: "YCN".to_string(),
            logo: None,
            email_domain: "student.college.edu".to_string(),
            admin_emails: vec![
                "admin@college.edu".to_string(),
                "placement@college.edu".to_string(),
            ],
            address: "College Address, City, State, PIN".to_string(),
            website: Some("https://www.college.edu".to_string()),
            theme: Theme {
                primary_color: "#6366f1".to_string(),
                secondary_color: "#8b5cf6".to_string(),
                accent_color: "#06b6d4".to_string(),
            },
            placement_cell: PlacementCell {
                email: "placement@college.edu".to_string(),
                phone: "+91-XXXX-XXXX".to_string(),
                coordinator_name: "Dr. Placement Coordinator".to_string(),
            },
            branches: vec![
                "Computer Science Engineering".to_string(),
                "Information Technology".to_string(),
                "Electronics and Communication".to_string(),
                "Mechanical Engineering".to_string(),
                "Civil Engineering".to_string(),
                "Electrical Engineering".to_string(),
            ],
            active_year: 2024,
        }
    }
}

impl CollegeConfig {
    /// Whether the email is on the configured admin list.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.admin_emails
            .iter()
            .any(|admin| normalize_email(admin) == email)
    }

    /// Whether the email belongs to the student email domain.
    pub fn is_student_email(&self, email: &str) -> bool {
        let domain = normalize_email(&self.email_domain);
        if domain.is_empty() {
            return false;
        }
        let email = normalize_email(email);
        match email.strip_suffix(&domain) {
            Some(local) => local.len() > 1 && local.ends_with('@'),
            None => false,
        }
    }

    /// Classify an email into a role. Admin list wins over the student domain.
    pub fn classify_email(&self, email: &str) -> Option<Role> {
        if self.is_admin_email(email) {
            Some(Role::Admin)
        } else if self.is_student_email(email) {
            Some(Role::Student)
        } else {
            None
        }
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.branches.iter().any(|b| b == branch)
    }
}

/// Request body for the college setup form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollegeRequest {
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub email_domain: String,
    #[serde(default)]
    pub admin_emails: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub website: Option<String>,
    pub theme: Theme,
    pub placement_cell: PlacementCell,
    #[serde(default)]
    pub branches: Vec<String>,
    pub active_year: i32,
}

/// Lowercase and trim an email for comparisons.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_admin_email() {
        let college = CollegeConfig::default();
        assert_eq!(college.classify_email("admin@college.edu"), Some(Role::Admin));
        assert_eq!(
            college.classify_email("  Placement@College.edu "),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_classify_student_email() {
        let college = CollegeConfig::default();
        assert_eq!(
            college.classify_email("jane.doe@student.college.edu"),
            Some(Role::Student)
        );
    }

    #[test]
    fn test_admin_list_wins_over_domain() {
        let mut college = CollegeConfig::default();
        college
            .admin_emails
            .push("tpo@student.college.edu".to_string());
        assert_eq!(
            college.classify_email("tpo@student.college.edu"),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_classify_rejects_other_emails() {
        let college = CollegeConfig::default();
        assert_eq!(college.classify_email("someone@gmail.com"), None);
        // Suffix must follow the `@`, not just end the string.
        assert_eq!(college.classify_email("x@evilstudent.college.edu"), None);
        assert_eq!(college.classify_email("@student.college.edu"), None);
        assert_eq!(college.classify_email("student.college.edu"), None);
    }
}
