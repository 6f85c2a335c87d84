//! Server configuration
//!
//! Read once from the environment at startup and handed to the service.

use std::path::PathBuf;

use crate::nutrition::{AgePolicy, CalcError};

/// Environment variable naming the SQLite file
pub const DATABASE_PATH_VAR: &str = "NUTRIPLAN_DATABASE_PATH";
/// Environment variable selecting the age parsing policy
pub const AGE_POLICY_VAR: &str = "NUTRIPLAN_AGE_POLICY";

/// Runtime settings for the MCP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_path: PathBuf,
    pub age_policy: AgePolicy,
}

impl ServerConfig {
    /// Build from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, CalcError> {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let age_policy = match std::env::var(AGE_POLICY_VAR) {
            Ok(value) => value.parse()?,
            Err(_) => AgePolicy::default(),
        };

        Ok(Self {
            database_path,
            age_policy,
        })
    }
}

/// `<project>/data/nutriplan.db`, resolved next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutriplan.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/nutriplan.db"));
    }
}
