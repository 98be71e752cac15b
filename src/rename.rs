use std::io::Write;

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::{
    dashboard::{Dashboard, DashboardError, ProvisionRequest},
    mapping::ClientMapping,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub attempted: usize,
    pub renamed: usize,
    pub api_errors: usize,
    pub other_errors: usize,
}

impl RenameSummary {
    pub fn failed(&self) -> usize {
        self.api_errors + self.other_errors
    }
}

/// Renames each client in `mappings` order, keeping its current policy.
///
/// A failure on one client is logged and counted; the next client is still
/// attempted. Only a failure to write a result to `out` stops the run.
pub fn execute<D, W>(
    dashboard: &D,
    network_id: &str,
    mappings: &[ClientMapping],
    out: &mut W,
) -> Result<RenameSummary>
where
    D: Dashboard + ?Sized,
    W: Write,
{
    let mut summary = RenameSummary::default();
    for mapping in mappings {
        summary.attempted += 1;
        match rename_client(dashboard, network_id, mapping) {
            Ok(result) => {
                writeln!(out, "{result}\n").context("Writing provisioning result")?;
                summary.renamed += 1;
            }
            Err(DashboardError::Api { status, message }) => {
                error!(
                    "Dashboard API error for '{}' ({}): {message} (HTTP {status})",
                    mapping.client_name, mapping.mac
                );
                summary.api_errors += 1;
            }
            Err(DashboardError::Other(message)) => {
                error!(
                    "Unexpected error for '{}' ({}): {message}",
                    mapping.client_name, mapping.mac
                );
                summary.other_errors += 1;
            }
        }
    }

    if summary.failed() > 0 {
        warn!(
            "{} of {} client(s) could not be renamed",
            summary.failed(),
            summary.attempted
        );
    }
    info!(
        "Renamed {} of {} client(s) in network {network_id}",
        summary.renamed, summary.attempted
    );
    Ok(summary)
}

fn rename_client<D>(
    dashboard: &D,
    network_id: &str,
    mapping: &ClientMapping,
) -> Result<serde_json::Value, DashboardError>
where
    D: Dashboard + ?Sized,
{
    let policy = dashboard.get_policy(network_id, &mapping.mac)?;
    let request = ProvisionRequest {
        network_id: network_id.to_string(),
        mac: mapping.mac.clone(),
        name: mapping.client_name.clone(),
        device_policy: policy.policy_type,
        group_policy_id: policy.group_policy_id,
    };
    dashboard.provision_client(&request)
}
