//! Database module for SQLite persistence.
//!
//! SQLite is the system of record for accounts, sessions, companies, rounds,
//! questions and the college settings.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('admin', 'student')),
            college_id TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            is_verified INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            last_login TEXT,
            permissions TEXT,
            branch TEXT,
            semester TEXT,
            roll_number TEXT,
            tenth_marks REAL,
            twelfth_marks REAL,
            cgpa REAL,
            backlogs INTEGER
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            college_id TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            package TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            website TEXT,
            visit_date TEXT,
            application_deadline TEXT NOT NULL,
            interview_dates TEXT,
            status TEXT NOT NULL,
            priority TEXT NOT NULL,
            min_cgpa REAL NOT NULL CHECK (min_cgpa BETWEEN 0 AND 10),
            min_tenth REAL NOT NULL CHECK (min_tenth BETWEEN 0 AND 100),
            min_twelfth REAL NOT NULL CHECK (min_twelfth BETWEEN 0 AND 100),
            max_backlogs INTEGER NOT NULL DEFAULT 0,
            eligible_branches TEXT NOT NULL,
            special_requirements TEXT,
            added_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS selection_rounds (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            round_type TEXT NOT NULL,
            duration TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            topics TEXT,
            is_elimination INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
            company_name TEXT NOT NULL,
            college_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            question_type TEXT NOT NULL,
            round TEXT,
            question TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            topics TEXT,
            description TEXT,
            hints TEXT,
            solution TEXT,
            added_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_companies_college ON companies(college_id);
        CREATE INDEX IF NOT EXISTS idx_rounds_company ON selection_rounds(company_id, position);
        CREATE INDEX IF NOT EXISTS idx_questions_college ON questions(college_id);
        CREATE INDEX IF NOT EXISTS idx_questions_company ON questions(company_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
