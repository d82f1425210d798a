//! Accounts and login sessions.
//!
//! A session is an opaque random token bound to one user until it expires or
//! the user logs out. Expired sessions are treated as absent and removed on use.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::auth::{hash_password_blocking, verify_password_blocking};
use crate::db::{NewUser, Repository, SessionRecord};
use crate::errors::AppError;
use crate::models::{
    normalize_email, AdminPermission, CollegeConfig, LoginRequest, LoginResponse,
    RegisterAdminRequest, Role, StudentProfile, StudentSignupRequest, User, UserProfile,
};
use crate::validation::{validate_admin_registration, validate_signup};

/// Issues, resolves and revokes sessions.
pub struct SessionManager {
    repo: Arc<Repository>,
    ttl: Duration,
    password_rounds: u32,
}

impl SessionManager {
    pub fn new(repo: Arc<Repository>, ttl_hours: i64, password_rounds: u32) -> Self {
        Self {
            repo,
            ttl: Duration::hours(ttl_hours),
            password_rounds,
        }
    }

    /// Create a student account.
    pub async fn signup(
        &self,
        request: StudentSignupRequest,
        college: &CollegeConfig,
    ) -> Result<User, AppError> {
        validate_signup(&request, college)?;

        let profile = StudentProfile {
            branch: request.branch,
            semester: request.semester.trim().to_string(),
            roll_number: request.roll_number.trim().to_string(),
            tenth_marks: request.tenth_marks.unwrap_or_default(),
            twelfth_marks: request.twelfth_marks.unwrap_or_default(),
            cgpa: request.cgpa.unwrap_or_default(),
            backlogs: request.backlogs.unwrap_or_default(),
        };
        let password_hash =
            hash_password_blocking(request.password, self.password_rounds).await?;

        let user = self
            .repo
            .create_user(NewUser {
                email: normalize_email(&request.email),
                name: request.name.trim().to_string(),
                college_id: college.id.clone(),
                password_hash,
                profile: UserProfile::Student(profile),
            })
            .await?;

        tracing::info!("Registered student {}", user.email);
        Ok(user)
    }

    /// Create an admin account for an email on the college's admin list.
    pub async fn register_admin(
        &self,
        request: RegisterAdminRequest,
        college: &CollegeConfig,
    ) -> Result<User, AppError> {
        validate_admin_registration(&request, college)?;

        let permissions = match request.permissions {
            Some(requested) => requested
                .into_iter()
                .filter(|p| *p != AdminPermission::ManageAdmins)
                .collect(),
            None => AdminPermission::defaults(),
        };
        let password_hash =
            hash_password_blocking(request.password, self.password_rounds).await?;

        let user = self
            .repo
            .create_user(NewUser {
                email: normalize_email(&request.email),
                name: request.name.trim().to_string(),
                college_id: college.id.clone(),
                password_hash,
                profile: UserProfile::Admin { permissions },
            })
            .await?;

        tracing::info!("Registered admin {}", user.email);
        Ok(user)
    }

    /// Verify credentials and open a session.
    pub async fn login(
        &self,
        request: LoginRequest,
        college: &CollegeConfig,
    ) -> Result<LoginResponse, AppError> {
        let email = normalize_email(&request.email);

        let Some(role) = college.classify_email(&email) else {
            return Err(AppError::Unauthorized(format!(
                "Please use your {} college email (ending with @{})",
                college.short_name, college.email_domain
            )));
        };

        let invalid = || {
            AppError::Unauthorized(match role {
                Role::Admin => "Invalid admin credentials. Please check your email and password.",
                Role::Student => "Invalid credentials. Please check your email and password.",
            }
            .to_string())
        };

        let Some(account) = self.repo.find_account(&email).await? else {
            tracing::info!("Login failed for unknown account {}", email);
            return Err(invalid());
        };

        if !verify_password_blocking(request.password, account.password_hash).await? {
            tracing::info!("Login failed for {}: wrong password", email);
            return Err(invalid());
        }

        if account.user.role() != role || account.user.college_id != college.id {
            tracing::warn!(
                "Login refused for {}: stored role {} does not match {}",
                email,
                account.user.role().as_str(),
                role.as_str()
            );
            return Err(invalid());
        }

        let now = Utc::now();
        let expires_at = now + self.ttl;
        let session = SessionRecord {
            token: uuid::Uuid::new_v4().to_string(),
            user_id: account.user.id.clone(),
            created_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        };
        self.repo.create_session(&session).await?;

        let last_login = now.to_rfc3339();
        self.repo
            .touch_last_login(&account.user.id, &last_login)
            .await?;

        let mut user = account.user;
        user.last_login = Some(last_login);

        tracing::info!("{} logged in as {}", user.email, role.as_str());

        Ok(LoginResponse {
            token: session.token,
            expires_at: expires_at.to_rfc3339(),
            user,
        })
    }

    /// Resolve a session token to its user.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, AppError> {
        let token = token.ok_or_else(|| AppError::Unauthorized("Login required".to_string()))?;

        let Some(session) = self.repo.find_session(token).await? else {
            return Err(AppError::Unauthorized("Invalid session".to_string()));
        };

        if is_expired(&session, Utc::now()) {
            self.repo.delete_session(token).await?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        self.repo
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))
    }

    /// Resolve a session and require a student.
    pub async fn require_student(&self, token: Option<&str>) -> Result<User, AppError> {
        let user = self.authenticate(token).await?;
        if user.role() != Role::Student {
            return Err(AppError::Forbidden("Student access required".to_string()));
        }
        Ok(user)
    }

    /// Resolve a session and require an admin holding `permission`.
    pub async fn require_admin(
        &self,
        token: Option<&str>,
        permission: AdminPermission,
    ) -> Result<User, AppError> {
        let user = self.authenticate(token).await?;
        if user.role() != Role::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        if !user.has_permission(permission) {
            return Err(AppError::Forbidden(format!(
                "Missing permission: {}",
                serde_json::to_value(permission)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            )));
        }
        Ok(user)
    }

    /// End a session. Logging out twice is not an error.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = token {
            if self.repo.delete_session(token).await? {
                tracing::info!("Session closed");
            }
        }
        Ok(())
    }

    /// Drop every expired session.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let removed = self
            .repo
            .delete_expired_sessions(Utc::now().timestamp())
            .await?;
        if removed > 0 {
            tracing::info!("Removed {} expired sessions", removed);
        }
        Ok(removed)
    }
}

fn is_expired(session: &SessionRecord, now: DateTime<Utc>) -> bool {
    session.expires_at <= now.timestamp()
}
