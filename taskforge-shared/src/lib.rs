//! # Taskforge Shared Library
//!
//! Shared types and business logic used by the taskforge API server.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, bearer token issue/verify, auth middleware
//! - `db`: connection pool and migration runner
//! - `models`: database models and their ownership-scoped operations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the taskforge shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
