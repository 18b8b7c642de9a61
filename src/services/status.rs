use tracing::debug;

use crate::models::build_result::{BuildResult, UNKNOWN_STATE};
use crate::models::container_group::ContainerGroup;
use crate::services::aci::{AciError, ContainerClient};
use crate::services::log_stream::tail_lines;

/// State of a build as far as it can be observed from its container group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedState {
    pub state: Option<String>,
    pub exit_code: Option<i32>,
    pub detail_status: Option<String>,
}

/// Extract the current state of the first container in a group.
///
/// No container yet: nothing is observable. Container without runtime state:
/// only the group's provisioning state is known.
pub fn container_state(group: &ContainerGroup) -> ObservedState {
    if group.first_container().is_none() {
        return ObservedState::default();
    }

    match group.current_state() {
        Some(current) => ObservedState {
            state: Some(current.state.clone()),
            exit_code: current.exit_code,
            detail_status: current.detail_status.clone().filter(|d| !d.is_empty()),
        },
        None => ObservedState {
            state: group.provisioning_state().map(str::to_string),
            ..ObservedState::default()
        },
    }
}

/// Fetch the full log of a container, or empty text when it cannot be read.
pub async fn fetch_logs(
    client: &dyn ContainerClient,
    resource_group: &str,
    container_group: &str,
    container: &str,
) -> String {
    match client.list_logs(resource_group, container_group, container).await {
        Ok(content) => content,
        Err(e) => {
            debug!(container_group, container, error = %e, "Log fetch failed, treating as empty");
            String::new()
        }
    }
}

/// Poll one image build and return its current result together with its full log.
///
/// The log tail is captured only once the build has terminated.
pub async fn poll_build(
    client: &dyn ContainerClient,
    resource_group: &str,
    image_name: &str,
    tail_line_count: usize,
) -> Result<(BuildResult, String), AciError> {
    let group = client.get_container_group(resource_group, image_name).await?;
    let observed = container_state(&group);

    let container_name = group
        .first_container()
        .map(|c| c.name.as_str())
        .unwrap_or(image_name);
    let logs = fetch_logs(client, resource_group, image_name, container_name).await;

    let state = observed
        .state
        .or_else(|| group.provisioning_state().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_STATE.to_string());

    let mut result = BuildResult {
        state,
        exit_code: observed.exit_code,
        detail_status: observed.detail_status,
        ..BuildResult::new(image_name)
    };

    if let Some(current) = group.current_state() {
        result.start_time = current.start_time.clone();
        result.finish_time = current.finish_time.clone();
    }

    if result.is_terminated() {
        result.logs_tail = tail_lines(&logs, tail_line_count);
    }

    Ok((result, logs))
}
