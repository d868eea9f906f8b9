//! Versioned schema migrations.
//!
//! Applied migrations are tracked in a `schema_migrations` history table so
//! startup can re-run from the top after a crash and only apply what is
//! pending. Each migration runs inside its own transaction. DDL is written
//! once with a `{auto_id}` placeholder; the provider-specific fragment is
//! substituted at apply time, which keeps provider dispatch in one place.

use sqlx::AnyPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MigrationPolicy;
use crate::db::connection::Provider;

#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// All known migrations, in apply order. Append only; never edit an entry
/// that has shipped.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "identity_tables",
        sql: "
            CREATE TABLE IF NOT EXISTS users (
                id {auto_id},
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS roles (
                id {auto_id},
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS user_roles (
                user_id BIGINT NOT NULL,
                role_id BIGINT NOT NULL,
                PRIMARY KEY (user_id, role_id)
            );
        ",
    },
    Migration {
        version: 2,
        name: "booking_requests",
        sql: "
            CREATE TABLE IF NOT EXISTS booking_requests (
                id {auto_id},
                client_name TEXT NOT NULL,
                email TEXT NOT NULL,
                body_part TEXT NOT NULL,
                idea_description TEXT NOT NULL,
                preferred_date TEXT NOT NULL,
                is_confirmed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_booking_requests_created_at
                ON booking_requests(created_at);
        ",
    },
    Migration {
        version: 3,
        name: "portfolio_and_styles",
        sql: "
            CREATE TABLE IF NOT EXISTS tattoo_styles (
                id {auto_id},
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS portfolio_items (
                id {auto_id},
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                image_url TEXT NOT NULL,
                style TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_portfolio_items_created_at
                ON portfolio_items(created_at);
        ",
    },
    Migration {
        version: 4,
        name: "sessions",
        sql: "
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id BIGINT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at
                ON sessions(expires_at);
        ",
    },
];

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("migration {version} ({name}) failed: {source}")]
    Failed {
        version: i64,
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Apply every pending migration in version order. Returns how many were
/// applied. Under [`MigrationPolicy::Continue`] a failure is logged, no
/// further migrations run, and the partial count is returned.
pub async fn apply_pending(
    pool: &AnyPool,
    provider: Provider,
    policy: MigrationPolicy,
) -> Result<u32, MigrationError> {
    apply_migrations(pool, provider, policy, MIGRATIONS).await
}

async fn apply_migrations(
    pool: &AnyPool,
    provider: Provider,
    policy: MigrationPolicy,
    migrations: &[Migration],
) -> Result<u32, MigrationError> {
    ensure_history_table(pool).await?;

    let applied_rows: Vec<(i64,)> = sqlx::query_as("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;
    let applied_versions: Vec<i64> = applied_rows.into_iter().map(|(v,)| v).collect();

    let mut applied = 0u32;
    for migration in migrations {
        if applied_versions.contains(&migration.version) {
            continue;
        }

        match apply_one(pool, provider, migration).await {
            Ok(()) => {
                info!(
                    version = migration.version,
                    name = migration.name,
                    "applied migration"
                );
                applied += 1;
            }
            Err(source) => match policy {
                MigrationPolicy::Abort => {
                    return Err(MigrationError::Failed {
                        version: migration.version,
                        name: migration.name,
                        source,
                    });
                }
                MigrationPolicy::Continue => {
                    warn!(
                        version = migration.version,
                        name = migration.name,
                        error = %source,
                        "migration failed, continuing startup with a partially migrated schema"
                    );
                    break;
                }
            },
        }
    }

    Ok(applied)
}

/// One migration, atomically: every statement plus the history row commit
/// together or not at all.
async fn apply_one(
    pool: &AnyPool,
    provider: Provider,
    migration: &Migration,
) -> Result<(), sqlx::Error> {
    let rendered = render_sql(migration.sql, provider);
    let mut tx = pool.begin().await?;

    for statement in rendered.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(&mut *tx).await?;
        }
    }

    sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES ($1, $2, $3)")
        .bind(migration.version)
        .bind(migration.name)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

async fn ensure_history_table(pool: &AnyPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

fn render_sql(sql: &str, provider: Provider) -> String {
    sql.replace("{auto_id}", auto_id_fragment(provider))
}

/// The one spot where DDL diverges per provider. SQL Server never reaches
/// this at runtime (connecting fails earlier), but the fragment keeps the
/// dispatch exhaustive.
fn auto_id_fragment(provider: Provider) -> &'static str {
    match provider {
        Provider::Postgres => "BIGSERIAL PRIMARY KEY",
        Provider::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        Provider::SqlServer => "BIGINT IDENTITY(1,1) PRIMARY KEY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::ConnectionSettings;
    use tempfile::TempDir;

    async fn setup_pool(temp_dir: &TempDir) -> AnyPool {
        let path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        ConnectionSettings::Sqlite { path }
            .connect()
            .await
            .expect("connect failed")
    }

    async fn table_exists(pool: &AnyPool, name: &str) -> bool {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=$1")
                .bind(name)
                .fetch_one(pool)
                .await
                .expect("query failed");
        row.0 == 1
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        let applied = apply_pending(&pool, Provider::Sqlite, MigrationPolicy::Abort)
            .await
            .expect("migrations failed");
        assert_eq!(applied as usize, MIGRATIONS.len());

        for table in [
            "users",
            "roles",
            "user_roles",
            "booking_requests",
            "tattoo_styles",
            "portfolio_items",
            "sessions",
        ] {
            assert!(table_exists(&pool, table).await, "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        apply_pending(&pool, Provider::Sqlite, MigrationPolicy::Abort)
            .await
            .expect("first run failed");
        let second = apply_pending(&pool, Provider::Sqlite, MigrationPolicy::Abort)
            .await
            .expect("second run failed");
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn test_history_records_versions_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        apply_pending(&pool, Provider::Sqlite, MigrationPolicy::Abort)
            .await
            .expect("migrations failed");

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT version, name FROM schema_migrations ORDER BY version")
                .fetch_all(&pool)
                .await
                .expect("query failed");
        let versions: Vec<i64> = rows.iter().map(|(v, _)| *v).collect();
        let expected: Vec<i64> = MIGRATIONS.iter().map(|m| m.version).collect();
        assert_eq!(versions, expected);
        assert_eq!(rows[0].1, "identity_tables");
    }

    #[tokio::test]
    async fn test_failure_aborts_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        let broken = [
            Migration {
                version: 1,
                name: "good",
                sql: "CREATE TABLE IF NOT EXISTS ok_table (id {auto_id})",
            },
            Migration {
                version: 2,
                name: "bad",
                sql: "CREATE BROKEN SYNTAX",
            },
        ];

        let result = apply_migrations(&pool, Provider::Sqlite, MigrationPolicy::Abort, &broken).await;
        match result {
            Err(MigrationError::Failed { version, name, .. }) => {
                assert_eq!(version, 2);
                assert_eq!(name, "bad");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        // The good migration before it is committed and on record.
        assert!(table_exists(&pool, "ok_table").await);
    }

    #[tokio::test]
    async fn test_continue_policy_stops_applying_but_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        let broken = [
            Migration {
                version: 1,
                name: "good",
                sql: "CREATE TABLE IF NOT EXISTS ok_table (id {auto_id})",
            },
            Migration {
                version: 2,
                name: "bad",
                sql: "CREATE BROKEN SYNTAX",
            },
            Migration {
                version: 3,
                name: "never_reached",
                sql: "CREATE TABLE IF NOT EXISTS later_table (id {auto_id})",
            },
        ];

        let applied =
            apply_migrations(&pool, Provider::Sqlite, MigrationPolicy::Continue, &broken)
                .await
                .expect("continue policy should not fail startup");
        assert_eq!(applied, 1);
        assert!(table_exists(&pool, "ok_table").await);
        assert!(!table_exists(&pool, "later_table").await);
    }

    #[tokio::test]
    async fn test_failed_migration_rolls_back_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let pool = setup_pool(&temp_dir).await;

        // First statement is valid, second is not; neither may stick.
        let broken = [Migration {
            version: 1,
            name: "half_bad",
            sql: "CREATE TABLE half_table (id {auto_id}); CREATE BROKEN SYNTAX",
        }];

        let result = apply_migrations(&pool, Provider::Sqlite, MigrationPolicy::Abort, &broken).await;
        assert!(result.is_err());
        assert!(!table_exists(&pool, "half_table").await);

        let rows: Vec<(i64,)> = sqlx::query_as("SELECT version FROM schema_migrations")
            .fetch_all(&pool)
            .await
            .expect("query failed");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_versions_are_ascending_and_unique() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn test_auto_id_rendering() {
        let rendered = render_sql("CREATE TABLE t (id {auto_id})", Provider::Postgres);
        assert_eq!(rendered, "CREATE TABLE t (id BIGSERIAL PRIMARY KEY)");
        let rendered = render_sql("CREATE TABLE t (id {auto_id})", Provider::Sqlite);
        assert_eq!(
            rendered,
            "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT)"
        );
    }
}
