//! Role-based access control.
//!
//! Authorization is a gate evaluated at the caller boundary before the
//! pipeline is invoked, not a pipeline stage. Capabilities are looked
//! up from a static table keyed by role.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::Role;

/// Capabilities a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Submit queries to the resolution pipeline
    QuerySubmission,
    /// Ingest or replace policy documents
    DocumentManagement,
    /// Read aggregated analytics
    AnalyticsView,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuerySubmission => "query_submission",
            Self::DocumentManagement => "document_management",
            Self::AnalyticsView => "analytics_view",
        }
    }

    /// Roles holding this capability.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            Self::QuerySubmission => &[
                Role::Employee,
                Role::Manager,
                Role::HrAdmin,
                Role::HrManager,
                Role::Executive,
            ],
            Self::DocumentManagement => &[Role::HrAdmin, Role::HrManager],
            Self::AnalyticsView => &[Role::HrAdmin, Role::HrManager, Role::Executive],
        }
    }
}

/// Check that `role` holds `capability`.
///
/// # Errors
///
/// - `PipelineError::Unauthorized` - the role lacks the capability. The
///   request is rejected before the pipeline starts.
pub fn authorize(role: Role, capability: Capability) -> DomainResult<()> {
    if capability.roles().contains(&role) {
        Ok(())
    } else {
        Err(PipelineError::Unauthorized {
            role,
            capability: capability.as_str().to_string(),
        })
    }
}
