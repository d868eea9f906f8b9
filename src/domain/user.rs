//! User accounts, roles, and login sessions.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Role granted to the seeded administrator account.
pub const ROLE_ADMIN: &str = "Admin";
/// Default role for ordinary accounts.
pub const ROLE_USER: &str = "User";

/// How long a login session stays valid.
pub const SESSION_TTL_HOURS: i64 = 24;

/// A stored user account. The password hash format is owned by the
/// `identity` module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An issued login session. Tokens are opaque UUIDs; expiry is checked on
/// every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Mint a fresh session with an opaque random token.
    pub fn issue(user_id: i64) -> Session {
        let now = Utc::now();
        Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
