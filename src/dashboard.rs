//! The two dashboard operations the rename run depends on.
//!
//! [`Dashboard`] is implemented over HTTP by [`crate::api::DashboardApi`];
//! tests substitute an in-memory fake.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Policy currently applied to a client, as reported by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(rename = "type")]
    pub policy_type: String,
    /// Echoed back verbatim, whatever JSON type the dashboard uses.
    #[serde(rename = "groupPolicyId", default)]
    pub group_policy_id: Option<Value>,
}

/// Rename of a single client that re-applies its existing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub network_id: String,
    pub mac: String,
    pub name: String,
    pub device_policy: String,
    pub group_policy_id: Option<Value>,
}

#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Other(String),
}

pub trait Dashboard {
    fn get_policy(&self, network_id: &str, mac: &str) -> Result<Policy, DashboardError>;

    fn provision_client(&self, request: &ProvisionRequest) -> Result<Value, DashboardError>;
}
