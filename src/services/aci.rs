use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::models::container_group::{ContainerGroup, ContainerLogs};

/// Read access to the container groups that run image builds.
#[async_trait]
pub trait ContainerClient: Send + Sync {
    /// Fetch the current descriptor of a container group.
    async fn get_container_group(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ContainerGroup, AciError>;

    /// Fetch the accumulated log text of one container.
    ///
    /// Logs that are not available yet come back as empty text, not an error.
    async fn list_logs(
        &self,
        resource_group: &str,
        container_group: &str,
        container: &str,
    ) -> Result<String, AciError>;
}

/// Client for the Azure Container Instances ARM REST API.
pub struct AciClient {
    http: Client,
    endpoint: String,
    subscription_id: String,
    access_token: String,
    api_version: String,
}

impl AciClient {
    pub fn new(
        endpoint: &str,
        subscription_id: &str,
        access_token: &str,
        api_version: &str,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_id: subscription_id.to_string(),
            access_token: access_token.to_string(),
            api_version: api_version.to_string(),
        }
    }

    fn group_url(&self, resource_group: &str, name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ContainerInstance/containerGroups/{}",
            self.endpoint, self.subscription_id, resource_group, name
        )
    }

    fn logs_url(&self, resource_group: &str, container_group: &str, container: &str) -> String {
        format!(
            "{}/containers/{}/logs",
            self.group_url(resource_group, container_group),
            container
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, AciError> {
        self.http
            .get(format!("{}?api-version={}", url, self.api_version))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(AciError::Http)
    }
}

#[async_trait]
impl ContainerClient for AciClient {
    async fn get_container_group(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<ContainerGroup, AciError> {
        let response = self.get(&self.group_url(resource_group, name)).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AciError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(AciError::Http)?;
        serde_json::from_str(&body).map_err(AciError::Parse)
    }

    async fn list_logs(
        &self,
        resource_group: &str,
        container_group: &str,
        container: &str,
    ) -> Result<String, AciError> {
        let url = self.logs_url(resource_group, container_group, container);
        let response = self.get(&url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::trace!(container_group, container, "Logs not available yet");
            return Ok(String::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AciError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(AciError::Http)?;
        let logs: ContainerLogs = serde_json::from_str(&body).map_err(AciError::Parse)?;
        Ok(logs.content.unwrap_or_default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AciError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Container Instances API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Container Instances response: {0}")]
    Parse(#[from] serde_json::Error),
}
