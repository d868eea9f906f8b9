//! Reference-data seeding.
//!
//! Runs once per startup, after migrations. Every step is a
//! read-check-then-write, so re-running from the top is the crash recovery
//! mechanism. Under concurrent startup of several instances the store's
//! uniqueness constraints decide the winner and the loser logs a warning.
//!
//! The seed lists travel in an explicit [`SeedData`] value built at the
//! call site; nothing here reads process globals.

use tracing::{info, warn};

use crate::config::AdminCredentials;
use crate::db::repo::Repository;
use crate::domain::{ROLE_ADMIN, ROLE_USER};
use crate::identity;

/// The styles the gallery filters on. Fixed set; seeding only ever adds
/// missing names, never updates or removes.
pub const STANDARD_STYLES: [&str; 7] = [
    "Blackwork",
    "Traditional",
    "Realistic",
    "Fine Line",
    "Geometric",
    "Japanese",
    "Lettering",
];

/// Everything the seeding pass needs, assembled by the caller.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub roles: Vec<String>,
    pub styles: Vec<String>,
    pub admin: Option<AdminCredentials>,
}

impl SeedData {
    /// The production seed set: both roles, all seven styles, and whatever
    /// administrator credentials the environment provided.
    pub fn standard(admin: Option<AdminCredentials>) -> SeedData {
        SeedData {
            roles: vec![ROLE_ADMIN.to_string(), ROLE_USER.to_string()],
            styles: STANDARD_STYLES.iter().map(|s| s.to_string()).collect(),
            admin,
        }
    }
}

/// What a seeding pass actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub lookup_rows_added: u64,
    pub admin_created: bool,
}

/// Seed roles, the style lookup table, and the administrator account.
///
/// Role and style rows found missing are queued and committed in a single
/// batch; every lookup row flows through it, so the summary counts each
/// exactly once. The administrator account follows in its own short
/// transaction, which then finds its role row already committed; policy
/// rejections and lost insert races are logged and absorbed, never fatal.
/// Store errors propagate.
pub async fn run(repo: &Repository, data: &SeedData) -> Result<SeedSummary, sqlx::Error> {
    let existing_roles = repo.list_role_names().await?;
    let pending_roles: Vec<String> = data
        .roles
        .iter()
        .filter(|name| !existing_roles.contains(name))
        .cloned()
        .collect();

    let existing_styles = repo.list_style_names().await?;
    let pending_styles: Vec<String> = data
        .styles
        .iter()
        .filter(|name| !existing_styles.contains(name))
        .cloned()
        .collect();

    let lookup_rows_added = repo
        .insert_lookup_batch(&pending_roles, &pending_styles)
        .await?;

    let admin_created = seed_admin(repo, data.admin.as_ref()).await?;

    info!(
        lookup_rows_added,
        admin_created, "reference data seeding complete"
    );

    Ok(SeedSummary {
        lookup_rows_added,
        admin_created,
    })
}

async fn seed_admin(
    repo: &Repository,
    admin: Option<&AdminCredentials>,
) -> Result<bool, sqlx::Error> {
    let Some(credentials) = admin else {
        warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping administrator account");
        return Ok(false);
    };

    if repo.find_user_by_email(&credentials.email).await?.is_some() {
        info!(email = %credentials.email, "administrator account already present, leaving it untouched");
        return Ok(false);
    }

    let password_hash = match identity::hash_password(&credentials.password) {
        Ok(hash) => hash,
        Err(err) => {
            warn!(email = %credentials.email, error = %err, "administrator password rejected, account not created");
            return Ok(false);
        }
    };

    match repo
        .create_user_with_role(&credentials.email, &password_hash, ROLE_ADMIN)
        .await?
    {
        Some(user_id) => {
            info!(email = %credentials.email, user_id, "created administrator account");
            Ok(true)
        }
        None => {
            warn!(email = %credentials.email, "administrator account created concurrently elsewhere, skipping");
            Ok(false)
        }
    }
}
