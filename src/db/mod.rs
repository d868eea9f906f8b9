//! Persistence layer.
//!
//! This module provides:
//! - Connection resolution across providers (postgres, sqlite)
//! - Versioned schema migrations
//! - Reference-data seeding
//! - Repository layer for database operations

pub mod connection;
pub mod migrations;
pub mod repo;
pub mod seed;

pub use connection::ConnectionSettings;
pub use repo::Repository;
