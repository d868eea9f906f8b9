//! Startup sequencing.
//!
//! One pass per process start, before the listener opens: resolve and open
//! the store, bring the schema up to date, seed reference data. The
//! sequence holds no state of its own; re-running it is the crash recovery
//! path.

use sqlx::AnyPool;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::db::connection::ConnectError;
use crate::db::migrations::{self, MigrationError};
use crate::db::repo::Repository;
use crate::db::seed::{self, SeedData};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to open database: {0}")]
    Connect(#[from] ConnectError),
    #[error("failed to migrate database: {0}")]
    Migrate(#[from] MigrationError),
    #[error("failed to seed database: {0}")]
    Seed(#[from] sqlx::Error),
}

/// Open the store, apply migrations, seed reference data. Returns the live
/// pool for the request path.
pub async fn run(config: &Config) -> Result<AnyPool, BootstrapError> {
    info!(store = %config.database.describe(), "opening store");
    let pool = config.database.connect().await?;

    let applied = migrations::apply_pending(
        &pool,
        config.database.provider(),
        config.migration_policy,
    )
    .await?;
    info!(applied, "schema up to date");

    let repo = Repository::new(pool.clone());
    let summary = seed::run(&repo, &SeedData::standard(config.admin.clone())).await?;
    info!(
        lookup_rows_added = summary.lookup_rows_added,
        admin_created = summary.admin_created,
        "store initialization complete"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationPolicy;
    use crate::db::connection::ConnectionSettings;
    use tempfile::TempDir;

    fn config_for(temp_dir: &TempDir) -> Config {
        Config {
            port: 8080,
            database: ConnectionSettings::Sqlite {
                path: temp_dir
                    .path()
                    .join("studio.db")
                    .to_string_lossy()
                    .to_string(),
            },
            migration_policy: MigrationPolicy::Abort,
            admin: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_produces_a_usable_store() {
        let temp_dir = TempDir::new().unwrap();
        let pool = run(&config_for(&temp_dir)).await.expect("bootstrap failed");

        let repo = Repository::new(pool);
        assert_eq!(repo.list_style_names().await.unwrap().len(), 7);
        assert_eq!(repo.list_role_names().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);

        run(&config).await.expect("first bootstrap failed");
        let pool = run(&config).await.expect("second bootstrap failed");

        let repo = Repository::new(pool);
        assert_eq!(repo.list_style_names().await.unwrap().len(), 7);
    }
}
