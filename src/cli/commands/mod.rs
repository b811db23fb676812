//! CLI command implementations.

pub mod analytics;
pub mod ingest;
pub mod init;
pub mod query;

use anyhow::{bail, Result};

use crate::domain::models::Role;

/// Parse the role claim flag shared by all commands.
pub(crate) fn parse_role(role: &str) -> Result<Role> {
    match Role::from_str(role) {
        Some(role) => Ok(role),
        None => bail!(
            "Unknown role '{role}'. Expected one of: employee, manager, hr_admin, hr_manager, executive"
        ),
    }
}
