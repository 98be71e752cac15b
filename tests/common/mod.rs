#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use client_rename::dashboard::{Dashboard, DashboardError, Policy, ProvisionRequest};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// A dashboard call as observed by [`FakeDashboard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetPolicy { network_id: String, mac: String },
    Provision(ProvisionRequest),
}

/// In-memory dashboard keyed by MAC address. Unknown MACs answer with a 404.
#[derive(Default)]
pub struct FakeDashboard {
    policies: HashMap<String, Value>,
    provision_failures: HashMap<String, DashboardError>,
    calls: RefCell<Vec<Call>>,
}

impl FakeDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the raw policy body returned for `mac`.
    pub fn with_policy(mut self, mac: &str, body: Value) -> Self {
        self.policies.insert(mac.to_string(), body);
        self
    }

    pub fn with_provision_failure(mut self, mac: &str, error: DashboardError) -> Self {
        self.provision_failures.insert(mac.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn provisioned(&self) -> Vec<ProvisionRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Provision(request) => Some(request.clone()),
                Call::GetPolicy { .. } => None,
            })
            .collect()
    }
}

impl Dashboard for FakeDashboard {
    fn get_policy(&self, network_id: &str, mac: &str) -> Result<Policy, DashboardError> {
        self.calls.borrow_mut().push(Call::GetPolicy {
            network_id: network_id.to_string(),
            mac: mac.to_string(),
        });
        let body = self.policies.get(mac).ok_or_else(|| DashboardError::Api {
            status: 404,
            message: format!("Client {mac} not found"),
        })?;
        serde_json::from_value(body.clone())
            .map_err(|err| DashboardError::Other(format!("Unexpected policy response: {err}")))
    }

    fn provision_client(&self, request: &ProvisionRequest) -> Result<Value, DashboardError> {
        self.calls
            .borrow_mut()
            .push(Call::Provision(request.clone()));
        if let Some(error) = self.provision_failures.get(&request.mac) {
            return Err(error.clone());
        }
        Ok(json!({
            "clients": [{"mac": request.mac, "name": request.name}],
            "devicePolicy": request.device_policy,
        }))
    }
}
