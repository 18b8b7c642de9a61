use garde::Validate;
use serde::Deserialize;
use std::time::Duration;

/// Default pause between polling sweeps.
pub const POLL_INTERVAL_SECONDS: u64 = 15;

/// Default number of log lines kept for failure reports.
pub const LOG_TAIL_LINES: usize = 50;

#[derive(Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Azure subscription that owns the build container groups
    #[garde(length(min = 1))]
    pub azure_subscription_id: String,

    /// Bearer token for the Azure Resource Manager API
    #[garde(length(min = 1))]
    pub azure_access_token: String,

    /// Azure AD tenant, used only to build portal links
    #[serde(default)]
    #[garde(skip)]
    pub azure_tenant_id: Option<String>,

    /// Resource group holding one container group per image
    #[garde(length(min = 1))]
    pub resource_group: String,

    /// Image names to monitor (comma-separated in the environment)
    #[serde(default)]
    #[garde(skip)]
    pub images: Vec<String>,

    /// Azure Resource Manager endpoint
    #[serde(default = "default_arm_endpoint")]
    #[garde(length(min = 1))]
    pub arm_endpoint: String,

    /// Container Instances API version
    #[serde(default = "default_aci_api_version")]
    #[garde(length(min = 1))]
    pub aci_api_version: String,

    #[serde(default = "default_poll_interval_secs")]
    #[garde(range(min = 1, max = 3600))]
    pub poll_interval_secs: u64,

    #[serde(default = "default_log_tail_lines")]
    #[garde(range(min = 1, max = 10000))]
    pub log_tail_lines: usize,

    /// Prometheus scrape listener address (e.g., "0.0.0.0:9000")
    #[serde(default)]
    #[garde(skip)]
    pub metrics_addr: Option<String>,

    /// Emit diagnostics as JSON lines instead of plain text
    #[serde(default)]
    #[garde(skip)]
    pub log_json: bool,
}

fn default_arm_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_aci_api_version() -> String {
    "2023-05-01".to_string()
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECONDS
}

fn default_log_tail_lines() -> usize {
    LOG_TAIL_LINES
}

/// Per-session tuning passed into the monitor, follower and reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub tail_lines: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECONDS),
            tail_lines: LOG_TAIL_LINES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn settings(&self) -> MonitorSettings {
        MonitorSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            tail_lines: self.log_tail_lines,
        }
    }

    /// Configured image names with blanks and surrounding whitespace removed.
    pub fn image_names(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Azure portal link for an image's container group, when the tenant is known.
    pub fn portal_url(&self, image_name: &str) -> Option<String> {
        let tenant = self.azure_tenant_id.as_deref()?;
        Some(format!(
            "https://portal.azure.com/#@{}/resource/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ContainerInstance/containerGroups/{}",
            tenant, self.azure_subscription_id, self.resource_group, image_name
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
