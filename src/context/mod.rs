//! Active college configuration.
//!
//! The configuration is stored as JSON in the `settings` table and cached in memory.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::CollegeConfig;

const SETTINGS_KEY: &str = "collegeConfig";

/// Shared handle to the active college configuration.
pub struct CollegeContext {
    repo: Arc<Repository>,
    current: RwLock<CollegeConfig>,
}

impl CollegeContext {
    /// Load the stored configuration, persisting the default on first start.
    pub async fn load(repo: Arc<Repository>) -> Result<Self, AppError> {
        let config = match repo.get_setting(SETTINGS_KEY).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(format!("Stored college configuration is invalid: {}", e))
            })?,
            None => {
                let config = CollegeConfig::default();
                repo.put_setting(SETTINGS_KEY, &serde_json::to_string(&config)?)
                    .await?;
                tracing::info!("Initialized default college configuration");
                config
            }
        };

        tracing::info!("Active college: {} ({})", config.name, config.id);

        Ok(Self {
            repo,
            current: RwLock::new(config),
        })
    }

    /// Snapshot of the active configuration.
    pub async fn get(&self) -> CollegeConfig {
        self.current.read().await.clone()
    }

    /// Persist a new configuration, then make it active.
    pub async fn update(&self, config: CollegeConfig) -> Result<CollegeConfig, AppError> {
        let mut current = self.current.write().await;
        self.repo
            .put_setting(SETTINGS_KEY, &serde_json::to_string(&config)?)
            .await?;
        *current = config.clone();

        tracing::info!("College configuration updated: {}", config.name);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_is_persisted_and_updates_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        let repo = Arc::new(Repository::new(pool));

        let context = CollegeContext::load(repo.clone()).await.unwrap();
        assert_eq!(context.get().await, CollegeConfig::default());
        assert!(repo.get_setting(SETTINGS_KEY).await.unwrap().is_some());

        let mut config = context.get().await;
        config.name = "Test Institute".to_string();
        context.update(config).await.unwrap();

        let reloaded = CollegeContext::load(repo).await.unwrap();
        assert_eq!(reloaded.get().await.name, "Test Institute");
    }
}
