use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::{
    StatusCode, Url,
    blocking::{Client, Response},
    header,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    cli::RunMode,
    dashboard::{Dashboard, DashboardError, Policy, ProvisionRequest},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking dashboard client. In simulate mode only read requests are sent;
/// mutating requests are logged and answered with the payload they carry.
pub struct DashboardApi {
    base_url: Url,
    api_key: String,
    mode: RunMode,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ProvisionPayload<'a> {
    clients: [ProvisionClient<'a>; 1],
    #[serde(rename = "devicePolicy")]
    device_policy: &'a str,
    #[serde(rename = "groupPolicyId", skip_serializing_if = "Option::is_none")]
    group_policy_id: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
struct ProvisionClient<'a> {
    mac: &'a str,
    name: &'a str,
}

impl<'a> From<&'a ProvisionRequest> for ProvisionPayload<'a> {
    fn from(request: &'a ProvisionRequest) -> Self {
        Self {
            clients: [ProvisionClient {
                mac: &request.mac,
                name: &request.name,
            }],
            device_policy: &request.device_policy,
            group_policy_id: request.group_policy_id.as_ref(),
        }
    }
}

impl DashboardApi {
    pub fn new(base_url: &str, api_key: &str, mode: RunMode, timeout_seconds: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Parsing base URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Base URL '{base_url}' cannot carry a path"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            mode,
            client,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<Value, DashboardError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .map_err(|err| DashboardError::Other(format!("Request failed: {err}")))?;
        decode_response(response)
    }
}

impl Dashboard for DashboardApi {
    fn get_policy(&self, network_id: &str, mac: &str) -> Result<Policy, DashboardError> {
        let url = self.endpoint(&["networks", network_id, "clients", mac, "policy"]);
        debug!("GET {url}");
        let body = self.send(self.client.get(url))?;
        serde_json::from_value(body)
            .map_err(|err| DashboardError::Other(format!("Unexpected policy response: {err}")))
    }

    fn provision_client(&self, request: &ProvisionRequest) -> Result<Value, DashboardError> {
        let url = self.endpoint(&["networks", &request.network_id, "clients", "provision"]);
        let payload = ProvisionPayload::from(request);
        if self.mode.is_simulate() {
            let body = serde_json::to_value(&payload)
                .map_err(|err| DashboardError::Other(err.to_string()))?;
            info!("Simulated POST {url} {body}");
            return Ok(body);
        }
        debug!("POST {url}");
        self.send(self.client.post(url).json(&payload))
    }
}

fn decode_response(response: Response) -> Result<Value, DashboardError> {
    let status = response.status();
    let text = response
        .text()
        .map_err(|err| DashboardError::Other(format!("Reading response body failed: {err}")))?;
    if !status.is_success() {
        return Err(DashboardError::Api {
            status: status.as_u16(),
            message: error_message(status, &text),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|err| DashboardError::Other(format!("Response is not valid JSON: {err}")))
}

/// Dashboard errors arrive as `{"errors": ["..."]}`; anything else is passed through.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let errors = value.get("errors")?.as_array()?;
        let messages: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
        (!messages.is_empty()).then(|| messages.join(", "))
    });
    if let Some(message) = from_json {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
