//! User, session and authentication request models.

use serde::{Deserialize, Serialize};

use super::CollegeConfig;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }
}

/// Fine-grained admin capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminPermission {
    ManageCompanies,
    ManageStudents,
    ManageQuestions,
    ViewAnalytics,
    ManageSettings,
    ManageAdmins,
}

impl AdminPermission {
    /// Permissions granted to a newly registered admin.
    pub fn defaults() -> Vec<AdminPermission> {
        vec![
            AdminPermission::ManageCompanies,
            AdminPermission::ManageStudents,
            AdminPermission::ManageQuestions,
            AdminPermission::ViewAnalytics,
            AdminPermission::ManageSettings,
        ]
    }
}

/// Academic record of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub branch: String,
    pub semester: String,
    pub roll_number: String,
    pub tenth_marks: f64,
    pub twelfth_marks: f64,
    pub cgpa: f64,
    pub backlogs: u32,
}

/// Role-specific part of a user. Serialized inline with a `role` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserProfile {
    Admin { permissions: Vec<AdminPermission> },
    Student(StudentProfile),
}

/// An account of the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub college_id: String,
    pub is_verified: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl User {
    pub fn role(&self) -> Role {
        match self.profile {
            UserProfile::Admin { .. } => Role::Admin,
            UserProfile::Student(_) => Role::Student,
        }
    }

    pub fn student_profile(&self) -> Option<&StudentProfile> {
        match &self.profile {
            UserProfile::Student(profile) => Some(profile),
            UserProfile::Admin { .. } => None,
        }
    }

    pub fn has_permission(&self, permission: AdminPermission) -> bool {
        match &self.profile {
            UserProfile::Admin { permissions } => permissions.contains(&permission),
            UserProfile::Student(_) => false,
        }
    }
}

/// Request body for student signup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSignupRequest {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub password: String,
    pub confirm_password: String,
    pub branch: String,
    #[serde(default)]
    pub semester: String,
    pub tenth_marks: Option<f64>,
    pub twelfth_marks: Option<f64>,
    pub cgpa: Option<f64>,
    pub backlogs: Option<u32>,
}

/// Request body for admin registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub permissions: Option<Vec<AdminPermission>>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly issued session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: User,
}

/// Current session as seen by the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub college: CollegeConfig,
    pub is_admin: bool,
    pub is_student: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User {
            id: "u1".to_string(),
            email: "a@student.college.edu".to_string(),
            name: "A".to_string(),
            college_id: "college-001".to_string(),
            is_verified: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            last_login: None,
            profile: UserProfile::Student(StudentProfile {
                branch: "Computer Science Engineering".to_string(),
                semester: "7".to_string(),
                roll_number: "CS001".to_string(),
                tenth_marks: 88.5,
                twelfth_marks: 91.2,
                cgpa: 8.7,
                backlogs: 0,
            }),
        }
    }

    #[test]
    fn test_user_serializes_role_inline() {
        let value = serde_json::to_value(student()).unwrap();
        assert_eq!(value["role"], "student");
        assert_eq!(value["cgpa"], 8.7);
        assert_eq!(value["collegeId"], "college-001");
        assert!(value.get("lastLogin").is_none());
    }

    #[test]
    fn test_admin_permissions() {
        let admin = User {
            profile: UserProfile::Admin {
                permissions: AdminPermission::defaults(),
            },
            ..student()
        };
        assert_eq!(admin.role(), Role::Admin);
        assert!(admin.has_permission(AdminPermission::ManageCompanies));
        assert!(!admin.has_permission(AdminPermission::ManageAdmins));
        assert!(!student().has_permission(AdminPermission::ManageCompanies));

        let value = serde_json::to_value(&admin).unwrap();
        assert_eq!(value["role"], "admin");
        assert_eq!(value["permissions"][0], "manage_companies");
    }
}
