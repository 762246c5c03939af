//! # Taskdeck Shared Library
//!
//! This crate contains shared types, data access, and board logic used by
//! the taskdeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `columns`: Pure board logic (column partitioning, positions, moves)
//! - `auth`: Token validation, request auth context, authorization checks
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod columns;
pub mod db;
pub mod models;

/// Current version of the taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
