//! Async client for the Fusion REST API

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::vm::{PowerAction, PowerOutcome, VmDetails, VmSummary, default_power_outcome};

/// Where `vmrest` listens unless told otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8697";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`FusionClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST service
    pub base_url: String,
    /// Basic auth username; empty disables auth
    pub username: String,
    /// Basic auth password
    pub password: String,
    /// Total timeout for each request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with no credentials
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Attach basic auth credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse and normalise a base URL, dropping any trailing slash
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] if the URL does not parse, is
/// not `http`/`https`, or cannot carry a path.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Client for the VMware Fusion REST API
///
/// Holds one pooled HTTP client; cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct FusionClient {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl FusionClient {
    /// Build a client from the given settings
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url,
            username: config.username,
            password: config.password,
        })
    }

    /// The normalised base URL, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Configured username (empty when auth is disabled)
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Configured password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// List all VMs registered with Fusion
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable, answers with a
    /// non-success status, or returns something other than a JSON array.
    pub async fn list_vms(&self) -> Result<Vec<VmSummary>, ClientError> {
        let url = self.endpoint(&[]);
        let response = self.send(Method::GET, url).await?;
        let response = check_status(response, None).await?;
        decode_json(response).await
    }

    /// Fetch detailed information about one VM
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidVmId`] for an id that cannot be a path
    /// segment, [`ClientError::VmNotFound`] on a 404, otherwise the same
    /// failures as [`FusionClient::list_vms`].
    pub async fn get_vm_info(&self, vm_id: &str) -> Result<VmDetails, ClientError> {
        check_vm_id(vm_id)?;
        let url = self.endpoint(&[vm_id]);
        let response = self.send(Method::GET, url).await?;
        let response = check_status(response, Some(vm_id)).await?;
        decode_json(response).await
    }

    /// Perform a power action on a VM
    ///
    /// An empty response body is reported as
    /// `{"status": "success", "action": <action>}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidVmId`] for an id that cannot be a path
    /// segment, [`ClientError::VmNotFound`] on a 404, otherwise the same
    /// failures as [`FusionClient::list_vms`].
    pub async fn power_vm(
        &self,
        vm_id: &str,
        action: PowerAction,
    ) -> Result<PowerOutcome, ClientError> {
        check_vm_id(vm_id)?;
        let url = self.endpoint(&[vm_id, action.as_str()]);
        let response = self.send(Method::POST, url).await?;
        let response = check_status(response, Some(vm_id)).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        if body.is_empty() {
            return Ok(default_power_outcome(action));
        }
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Perform a power action given by name
    ///
    /// The action is validated before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidAction`] for an unknown action, otherwise
    /// the same failures as [`FusionClient::power_vm`].
    pub async fn power_vm_str(
        &self,
        vm_id: &str,
        action: &str,
    ) -> Result<PowerOutcome, ClientError> {
        let action: PowerAction = action.parse()?;
        self.power_vm(vm_id, action).await
    }

    /// `{base}/fusionsvc/vms` followed by the given segments, each encoded
    ///
    /// `.` and `..` segments are dropped by the URL serializer, so callers
    /// pass ids through [`check_vm_id`] first.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["fusionsvc", "vms"]).extend(segments);
        }
        url
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, ClientError> {
        debug!(%method, %url, "Fusion API request");

        let mut request = self.http.request(method.clone(), url.clone());
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "Fusion API unreachable");
            ClientError::Connection(e)
        })
    }
}

/// Reject ids that would not survive as a single path segment
fn check_vm_id(vm_id: &str) -> Result<(), ClientError> {
    if matches!(vm_id, "" | "." | "..") {
        return Err(ClientError::InvalidVmId {
            vm_id: vm_id.to_string(),
        });
    }
    Ok(())
}

/// Map non-success statuses onto [`ClientError`]
///
/// A 404 becomes `VmNotFound` only for per-VM requests.
async fn check_status(
    response: Response,
    vm_id: Option<&str>,
) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(status = status.as_u16(), url = %response.url(), "Fusion API returned an error");

    if let (StatusCode::NOT_FOUND, Some(vm_id)) = (status, vm_id) {
        return Err(ClientError::VmNotFound {
            vm_id: vm_id.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
