use std::collections::HashMap;

use thiserror::Error;

use crate::db::connection::ConnectionSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: ConnectionSettings,
    pub migration_policy: MigrationPolicy,
    pub admin: Option<AdminCredentials>,
    pub email: Option<EmailSettings>,
}

/// What to do when a schema migration fails at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPolicy {
    /// Refuse to start. The safe default.
    Abort,
    /// Log the failure, stop applying further migrations, start anyway.
    Continue,
}

/// Seed credentials for the administrator account. Only ever sourced from
/// the environment; there is no built-in default.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database = ConnectionSettings::resolve(&env_map)?;

        let migration_policy = match env_map
            .get("MIGRATION_POLICY")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("abort")
        {
            "abort" => MigrationPolicy::Abort,
            "continue" => MigrationPolicy::Continue,
            other => {
                return Err(ConfigError::InvalidValue(
                    "MIGRATION_POLICY".to_string(),
                    format!("must be abort or continue, got {}", other),
                ))
            }
        };

        let admin = parse_admin_from_map(&env_map)?;
        let email = parse_email_from_map(&env_map)?;

        Ok(Config {
            port,
            database,
            migration_policy,
            admin,
            email,
        })
    }
}

/// Administrator credentials are all-or-nothing: one half without the other
/// is a misconfiguration, not something to guess around.
fn parse_admin_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Option<AdminCredentials>, ConfigError> {
    let email = non_empty(env_map, "ADMIN_EMAIL");
    let password = non_empty(env_map, "ADMIN_PASSWORD");

    match (email, password) {
        (Some(email), Some(password)) => Ok(Some(AdminCredentials {
            email: email.to_string(),
            password: password.to_string(),
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::MissingEnv("ADMIN_PASSWORD".to_string())),
        (None, Some(_)) => Err(ConfigError::MissingEnv("ADMIN_EMAIL".to_string())),
    }
}

/// SMTP is optional as a whole: without `SMTP_HOST` the service runs and
/// skips notifications. With it, the remaining pieces are required.
fn parse_email_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Option<EmailSettings>, ConfigError> {
    let Some(smtp_host) = non_empty(env_map, "SMTP_HOST") else {
        return Ok(None);
    };

    let smtp_port = env_map
        .get("SMTP_PORT")
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("587")
        .parse::<u16>()
        .map_err(|_| {
            ConfigError::InvalidValue("SMTP_PORT".to_string(), "must be a valid u16".to_string())
        })?;

    let smtp_username = non_empty(env_map, "SMTP_USERNAME")
        .ok_or_else(|| ConfigError::MissingEnv("SMTP_USERNAME".to_string()))?;
    let smtp_password = non_empty(env_map, "SMTP_PASSWORD")
        .ok_or_else(|| ConfigError::MissingEnv("SMTP_PASSWORD".to_string()))?;
    let sender_email = non_empty(env_map, "SENDER_EMAIL")
        .ok_or_else(|| ConfigError::MissingEnv("SENDER_EMAIL".to_string()))?;
    let sender_name = non_empty(env_map, "SENDER_NAME").unwrap_or("InkStudio");

    Ok(Some(EmailSettings {
        smtp_host: smtp_host.to_string(),
        smtp_port,
        smtp_username: smtp_username.to_string(),
        smtp_password: smtp_password.to_string(),
        sender_email: sender_email.to_string(),
        sender_name: sender_name.to_string(),
    }))
}

fn non_empty<'a>(env_map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
}
