// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of [`HubClient`] for the Home Center REST API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use crate::error::HubError;
use crate::hub::{Device, DeviceProperties, HubClient, Scene};

// ============================================================================
// HubConfig
// ============================================================================

/// Where the Home Center lives and how to authenticate against it.
///
/// The host is used as given: a bare address gets `http://` in front, while
/// a value that already names a scheme (`https://hc2.local:8443`) is taken
/// verbatim.
///
/// # Examples
///
/// ```
/// use fibaro_bridge::hub::HubConfig;
/// use std::time::Duration;
///
/// let config = HubConfig::new("192.168.1.20")
///     .with_credentials("admin", "password")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.20");
/// ```
#[derive(Debug, Clone)]
pub struct HubConfig {
    host: String,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl HubConfig {
    /// Request timeout used unless overridden.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Targets the Home Center at `host`, with or without a port or scheme.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Root URL the `/api` paths hang off, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// [`HubError::InvalidAddress`] for a blank host, [`HubError::Http`] when
    /// the underlying reqwest client fails to build.
    pub fn into_client(self) -> Result<HttpHubClient, HubError> {
        if self.host.trim().is_empty() {
            return Err(HubError::InvalidAddress("host is required".to_string()));
        }
        let base_url = self.base_url();
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(HubError::Http)?;

        Ok(HttpHubClient {
            base_url,
            client,
            credentials: self.credentials,
        })
    }
}

// ============================================================================
// HttpHubClient
// ============================================================================

/// Home Center client over the `/api` REST endpoints.
///
/// # Examples
///
/// ```no_run
/// use fibaro_bridge::hub::{HubClient, HubConfig};
///
/// # async fn example() -> fibaro_bridge::Result<()> {
/// let client = HubConfig::new("192.168.1.20")
///     .with_credentials("admin", "admin")
///     .into_client()?;
/// let devices = client.get_devices().await?;
/// println!("{} devices", devices.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpHubClient {
    base_url: String,
    client: Client,
    credentials: Option<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct GlobalVariable {
    #[serde(default)]
    value: serde_json::Value,
}

impl HttpHubClient {
    /// Returns the base URL of the Home Center.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, HubError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                HubError::ConnectionFailed(e.to_string())
            } else {
                HubError::Http(e)
            }
        })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(HubError::AuthenticationFailed);
        }
        if !response.status().is_success() {
            return Err(HubError::Status {
                code: response.status().as_u16(),
                reason: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, HubError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let response = self.send(self.client.get(&url)).await?;
        Ok(response.json().await?)
    }
}

impl HubClient for HttpHubClient {
    async fn get_devices(&self) -> Result<Vec<Device>, HubError> {
        self.get_json("devices").await
    }

    async fn get_scenes(&self) -> Result<Vec<Scene>, HubError> {
        self.get_json("scenes").await
    }

    async fn get_device_properties(&self, id: u64) -> Result<DeviceProperties, HubError> {
        match self.get_json::<Device>(&format!("devices/{id}")).await {
            Ok(device) => Ok(device.properties),
            Err(HubError::Status { code: 404, .. }) => Err(HubError::DeviceNotFound(id)),
            Err(e) => Err(e),
        }
    }

    async fn get_global_variable(&self, name: &str) -> Result<String, HubError> {
        let path = format!("globalVariables/{}", urlencoding::encode(name));
        let variable: GlobalVariable = self.get_json(&path).await?;
        Ok(match variable.value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    async fn set_device_property(
        &self,
        id: u64,
        action: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<(), HubError> {
        let url = self.url(&format!(
            "devices/{id}/action/{}",
            urlencoding::encode(action)
        ));
        tracing::debug!(url = %url, ?args, "POST device action");
        self.send(self.client.post(&url).json(&json!({ "args": args })))
            .await?;
        Ok(())
    }

    async fn set_global_variable(&self, name: &str, value: &str) -> Result<(), HubError> {
        let url = self.url(&format!("globalVariables/{}", urlencoding::encode(name)));
        tracing::debug!(url = %url, value, "PUT global variable");
        self.send(
            self.client
                .put(&url)
                .json(&json!({ "name": name, "value": value })),
        )
        .await?;
        Ok(())
    }

    async fn run_scene(&self, id: u64) -> Result<(), HubError> {
        let url = self.url(&format!("scenes/{id}/action/start"));
        tracing::debug!(url = %url, "POST scene start");
        self.send(self.client.post(&url).json(&json!({}))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults() {
        let config = HubConfig::new("192.168.1.20");
        assert_eq!(config.base_url(), "http://192.168.1.20");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn base_url_keeps_explicit_port() {
        let config = HubConfig::new("192.168.1.20:8080");
        assert_eq!(config.base_url(), "http://192.168.1.20:8080");
    }

    #[test]
    fn base_url_keeps_explicit_scheme() {
        assert_eq!(
            HubConfig::new("http://127.0.0.1:5555/").base_url(),
            "http://127.0.0.1:5555"
        );
        assert_eq!(
            HubConfig::new("https://hc2.local").base_url(),
            "https://hc2.local"
        );
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            HubConfig::new("  ").into_client(),
            Err(HubError::InvalidAddress(_))
        ));
    }

    #[test]
    fn into_client_builds_api_urls() {
        let client = HubConfig::new("10.0.0.2")
            .with_credentials("admin", "secret")
            .into_client()
            .unwrap();
        assert_eq!(client.url("devices"), "http://10.0.0.2/api/devices");
        assert!(client.credentials.is_some());
    }
}
