//! Database repository for CRUD operations.
//!
//! Uses prepared statements, and a transaction wherever one logical write spans
//! several rows.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AdminPermission, AdminStats, Company, CompanyStatus, CreateCompanyRequest,
    CreateQuestionRequest, Eligibility, Priority, Question, Round, RoundType, StatusCount,
    StudentProfile, User, UserProfile,
};

/// A user row together with its password hash, used only for credential checks.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password_hash: String,
}

/// Data needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub college_id: String,
    pub password_hash: String,
    pub profile: UserProfile,
}

/// A stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}

const USER_COLUMNS: &str = "id, email, name, role, college_id, password_hash, is_verified, created_at, last_login, permissions, branch, semester, roll_number, tenth_marks, twelfth_marks, cgpa, backlogs";

const COMPANY_COLUMNS: &str = "id, college_id, name, role, package, location, description, website, visit_date, application_deadline, interview_dates, status, priority, min_cgpa, min_tenth, min_twelfth, max_backlogs, eligible_branches, special_requirements, added_by, created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, company_id, company_name, college_id, year, question_type, round, question, difficulty, topics, description, hints, solution, added_by, created_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== SETTINGS ====================

    /// Read a JSON setting by key.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    /// Insert or replace a JSON setting.
    pub async fn put_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ==================== USER OPERATIONS ====================

    /// Create an account. Emails are unique.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let (role, permissions_json, student) = match &new_user.profile {
            UserProfile::Admin { permissions } => {
                ("admin", Some(serde_json::to_string(permissions)?), None)
            }
            UserProfile::Student(profile) => ("student", None, Some(profile)),
        };

        let result = sqlx::query(&format!(
            "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, 1, ?, NULL, ?, ?, ?, ?, ?, ?, ?, ?)",
            USER_COLUMNS
        ))
        .bind(&id)
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(role)
        .bind(&new_user.college_id)
        .bind(&new_user.password_hash)
        .bind(&now)
        .bind(&permissions_json)
        .bind(student.map(|s| s.branch.clone()))
        .bind(student.map(|s| s.semester.clone()))
        .bind(student.map(|s| s.roll_number.clone()))
        .bind(student.map(|s| s.tenth_marks))
        .bind(student.map(|s| s.twelfth_marks))
        .bind(student.map(|s| s.cgpa))
        .bind(student.map(|s| i64::from(s.backlogs)))
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.is_unique_violation() {
                return Err(AppError::Conflict(format!(
                    "An account for {} already exists",
                    new_user.email
                )));
            }
        }
        result?;

        Ok(User {
            id,
            email: new_user.email,
            name: new_user.name,
            college_id: new_user.college_id,
            is_verified: true,
            created_at: now,
            last_login: None,
            profile: new_user.profile,
        })
    }

    /// Find an account with its password hash by (normalized) email.
    pub async fn find_account(&self, email: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(|row| Account {
            user: user_from_row(row),
            password_hash: row.get("password_hash"),
        }))
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// List the students of a college, by name.
    pub async fn list_students(&self, college_id: &str) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users WHERE role = 'student' AND college_id = ? ORDER BY name",
            USER_COLUMNS
        ))
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, user_id: &str, at: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== SESSION OPERATIONS ====================

    pub async fn create_session(&self, session: &SessionRecord) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_session(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SessionRecord {
            token: row.get("token"),
            user_id: row.get("user_id"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }))
    }

    /// Delete a session. Returns whether it existed.
    pub async fn delete_session(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every session that expired before `now` (unix seconds).
    pub async fn delete_expired_sessions(&self, now: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ==================== COMPANY OPERATIONS ====================

    /// Create a company and its selection rounds atomically.
    ///
    /// Either the company and every round are stored, or nothing is.
    pub async fn create_company(
        &self,
        request: &CreateCompanyRequest,
        college_id: &str,
        added_by: &str,
    ) -> Result<Company, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let branches: Vec<String> = request
            .eligible_branches
            .iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
        let eligibility = Eligibility {
            cgpa: request.min_cgpa.unwrap_or_default(),
            tenth: request.min_tenth.unwrap_or_default(),
            twelfth: request.min_twelfth.unwrap_or_default(),
            backlogs: request.max_backlogs,
            branches,
            special_requirements: non_blank(&request.special_requirements),
        };
        let branches_json = serde_json::to_string(&eligibility.branches)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO companies ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            COMPANY_COLUMNS
        ))
        .bind(&id)
        .bind(college_id)
        .bind(request.name.trim())
        .bind(request.role.trim())
        .bind(request.package.trim())
        .bind(request.location.trim())
        .bind(&request.description)
        .bind(non_blank(&request.website))
        .bind(non_blank(&request.visit_date))
        .bind(request.application_deadline.trim())
        .bind(non_blank(&request.interview_dates))
        .bind(request.status.as_str())
        .bind(request.priority.as_str())
        .bind(eligibility.cgpa)
        .bind(eligibility.tenth)
        .bind(eligibility.twelfth)
        .bind(i64::from(eligibility.backlogs))
        .bind(&branches_json)
        .bind(&eligibility.special_requirements)
        .bind(added_by)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let mut rounds = Vec::with_capacity(request.rounds.len());
        for (index, round) in request.rounds.iter().enumerate() {
            let round = Round {
                id: uuid::Uuid::new_v4().to_string(),
                name: round.name.trim().to_string(),
                round_type: round.round_type,
                duration: round.duration.clone(),
                description: round.description.clone(),
                topics: round.topics.clone(),
                is_elimination: round.is_elimination,
                order: index as i32 + 1,
            };

            sqlx::query(
                "INSERT INTO selection_rounds (id, company_id, position, name, round_type, duration, description, topics, is_elimination) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&round.id)
            .bind(&id)
            .bind(round.order)
            .bind(&round.name)
            .bind(round.round_type.as_str())
            .bind(&round.duration)
            .bind(&round.description)
            .bind(serde_json::to_string(&round.topics)?)
            .bind(round.is_elimination as i32)
            .execute(&mut *tx)
            .await?;

            rounds.push(round);
        }

        tx.commit().await?;

        Ok(Company {
            id,
            college_id: college_id.to_string(),
            name: request.name.trim().to_string(),
            role: request.role.trim().to_string(),
            package: request.package.trim().to_string(),
            location: request.location.trim().to_string(),
            description: request.description.clone(),
            website: non_blank(&request.website),
            visit_date: non_blank(&request.visit_date),
            application_deadline: request.application_deadline.trim().to_string(),
            interview_dates: non_blank(&request.interview_dates),
            status: request.status,
            priority: request.priority,
            eligibility,
            rounds,
            added_by: added_by.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List a college's companies with their rounds, in creation order.
    pub async fn list_companies(&self, college_id: &str) -> Result<Vec<Company>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM companies WHERE college_id = ? ORDER BY rowid",
            COMPANY_COLUMNS
        ))
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        let round_rows = sqlx::query(
            r#"SELECT r.id, r.company_id, r.position, r.name, r.round_type, r.duration,
                      r.description, r.topics, r.is_elimination
               FROM selection_rounds r
               JOIN companies c ON c.id = r.company_id
               WHERE c.college_id = ?
               ORDER BY r.position"#,
        )
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        let mut rounds_by_company: HashMap<String, Vec<Round>> = HashMap::new();
        for row in &round_rows {
            let company_id: String = row.get("company_id");
            rounds_by_company
                .entry(company_id)
                .or_default()
                .push(round_from_row(row));
        }

        Ok(rows
            .iter()
            .map(|row| {
                let mut company = company_from_row(row);
                company.rounds = rounds_by_company.remove(&company.id).unwrap_or_default();
                company
            })
            .collect())
    }

    /// Get a company with its rounds.
    pub async fn get_company(&self, id: &str) -> Result<Option<Company>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM companies WHERE id = ?",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let round_rows = sqlx::query(
            "SELECT id, company_id, position, name, round_type, duration, description, topics, is_elimination FROM selection_rounds WHERE company_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut company = company_from_row(&row);
        company.rounds = round_rows.iter().map(round_from_row).collect();
        Ok(Some(company))
    }

    /// Change a company's status.
    pub async fn update_company_status(
        &self,
        id: &str,
        status: CompanyStatus,
    ) -> Result<Company, AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE companies SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Company {} not found", id)));
        }

        self.get_company(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))
    }

    /// Delete a company. Its rounds and questions go with it.
    pub async fn delete_company(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Company {} not found", id)));
        }
        Ok(())
    }

    // ==================== QUESTION OPERATIONS ====================

    /// Create a question for an existing company.
    pub async fn create_question(
        &self,
        request: &CreateQuestionRequest,
        company: &Company,
        added_by: &str,
    ) -> Result<Question, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let topics: Vec<String> = request
            .topics
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let hints_json = request
            .hints
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(&format!(
            "INSERT INTO questions ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            QUESTION_COLUMNS
        ))
        .bind(&id)
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.college_id)
        .bind(request.year)
        .bind(request.question_type.as_str())
        .bind(non_blank(&request.round))
        .bind(request.question.trim())
        .bind(request.difficulty.as_str())
        .bind(serde_json::to_string(&topics)?)
        .bind(non_blank(&request.description))
        .bind(&hints_json)
        .bind(non_blank(&request.solution))
        .bind(added_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Question {
            id,
            company_id: company.id.clone(),
            company: company.name.clone(),
            college_id: company.college_id.clone(),
            year: request.year,
            question_type: request.question_type,
            round: non_blank(&request.round),
            question: request.question.trim().to_string(),
            difficulty: request.difficulty,
            topics,
            description: non_blank(&request.description),
            hints: request.hints.clone(),
            solution: non_blank(&request.solution),
            added_by: added_by.to_string(),
            created_at: now,
        })
    }

    /// List a college's questions in insertion order.
    pub async fn list_questions(&self, college_id: &str) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE college_id = ? ORDER BY rowid",
            QUESTION_COLUMNS
        ))
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().filter_map(question_from_row).collect())
    }

    /// List a company's questions in insertion order.
    pub async fn list_company_questions(&self, company_id: &str) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE company_id = ? ORDER BY rowid",
            QUESTION_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().filter_map(question_from_row).collect())
    }

    /// Get a question by ID.
    pub async fn get_question(&self, id: &str) -> Result<Option<Question>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE id = ?",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().and_then(question_from_row))
    }

    /// Delete a question.
    pub async fn delete_question(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Question {} not found", id)));
        }
        Ok(())
    }

    // ==================== STATISTICS ====================

    /// Counters for the admin dashboard.
    pub async fn admin_stats(&self, college_id: &str) -> Result<AdminStats, AppError> {
        let status_rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM companies WHERE college_id = ? GROUP BY status ORDER BY status",
        )
        .bind(college_id)
        .fetch_all(&self.pool)
        .await?;

        let companies_by_status: Vec<StatusCount> = status_rows
            .iter()
            .map(|row| StatusCount {
                status: row.get("status"),
                count: row.get("count"),
            })
            .collect();

        let total_companies = companies_by_status.iter().map(|s| s.count).sum();
        let active_companies = companies_by_status
            .iter()
            .filter(|s| {
                s.status
                    .parse::<CompanyStatus>()
                    .is_ok_and(|status| status.is_active())
            })
            .map(|s| s.count)
            .sum();

        let total_students: i64 = sqlx::query(
            "SELECT COUNT(*) AS count FROM users WHERE role = 'student' AND college_id = ?",
        )
        .bind(college_id)
        .fetch_one(&self.pool)
        .await?
        .get("count");

        let questions_bank: i64 =
            sqlx::query("SELECT COUNT(*) AS count FROM questions WHERE college_id = ?")
                .bind(college_id)
                .fetch_one(&self.pool)
                .await?
                .get("count");

        Ok(AdminStats {
            total_companies,
            active_companies,
            total_students,
            questions_bank,
            companies_by_status,
        })
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    let is_verified: i32 = row.get("is_verified");

    let profile = if role == "admin" {
        let permissions: Option<String> = row.get("permissions");
        UserProfile::Admin {
            permissions: permissions
                .and_then(|p| serde_json::from_str::<Vec<AdminPermission>>(&p).ok())
                .unwrap_or_default(),
        }
    } else {
        let backlogs: Option<i64> = row.get("backlogs");
        UserProfile::Student(StudentProfile {
            branch: row.get::<Option<String>, _>("branch").unwrap_or_default(),
            semester: row.get::<Option<String>, _>("semester").unwrap_or_default(),
            roll_number: row
                .get::<Option<String>, _>("roll_number")
                .unwrap_or_default(),
            tenth_marks: row.get::<Option<f64>, _>("tenth_marks").unwrap_or_default(),
            twelfth_marks: row
                .get::<Option<f64>, _>("twelfth_marks")
                .unwrap_or_default(),
            cgpa: row.get::<Option<f64>, _>("cgpa").unwrap_or_default(),
            backlogs: backlogs
                .and_then(|b| u32::try_from(b).ok())
                .unwrap_or_default(),
        })
    };

    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        college_id: row.get("college_id"),
        is_verified: is_verified != 0,
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
        profile,
    }
}

fn company_from_row(row: &sqlx::sqlite::SqliteRow) -> Company {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    let branches: String = row.get("eligible_branches");
    let max_backlogs: i64 = row.get("max_backlogs");

    Company {
        id: row.get("id"),
        college_id: row.get("college_id"),
        name: row.get("name"),
        role: row.get("role"),
        package: row.get("package"),
        location: row.get("location"),
        description: row.get("description"),
        website: row.get("website"),
        visit_date: row.get("visit_date"),
        application_deadline: row.get("application_deadline"),
        interview_dates: row.get("interview_dates"),
        status: status.parse().unwrap_or_default(),
        priority: priority.parse::<Priority>().unwrap_or_default(),
        eligibility: Eligibility {
            cgpa: row.get("min_cgpa"),
            tenth: row.get("min_tenth"),
            twelfth: row.get("min_twelfth"),
            backlogs: u32::try_from(max_backlogs).unwrap_or_default(),
            branches: parse_json_array(&branches),
            special_requirements: row.get("special_requirements"),
        },
        rounds: Vec::new(),
        added_by: row.get("added_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn round_from_row(row: &sqlx::sqlite::SqliteRow) -> Round {
    let round_type: String = row.get("round_type");
    let topics: Option<String> = row.get("topics");
    let is_elimination: i32 = row.get("is_elimination");

    Round {
        id: row.get("id"),
        name: row.get("name"),
        round_type: round_type.parse::<RoundType>().unwrap_or_default(),
        duration: row.get("duration"),
        description: row.get("description"),
        topics: topics.map(|t| parse_json_array(&t)).unwrap_or_default(),
        is_elimination: is_elimination != 0,
        order: row.get("position"),
    }
}

/// Rows with an unknown type or difficulty are skipped with a warning.
fn question_from_row(row: &sqlx::sqlite::SqliteRow) -> Option<Question> {
    let id: String = row.get("id");
    let question_type: String = row.get("question_type");
    let difficulty: String = row.get("difficulty");
    let topics: Option<String> = row.get("topics");
    let hints: Option<String> = row.get("hints");

    let (Ok(question_type), Ok(difficulty)) = (question_type.parse(), difficulty.parse()) else {
        tracing::warn!("Skipping question {} with unknown type or difficulty", id);
        return None;
    };

    Some(Question {
        id,
        company_id: row.get("company_id"),
        company: row.get("company_name"),
        college_id: row.get("college_id"),
        year: row.get("year"),
        question_type,
        round: row.get("round"),
        question: row.get("question"),
        difficulty,
        topics: topics.map(|t| parse_json_array(&t)).unwrap_or_default(),
        description: row.get("description"),
        hints: hints.map(|h| parse_json_array(&h)),
        solution: row.get("solution"),
        added_by: row.get("added_by"),
        created_at: row.get("created_at"),
    })
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
