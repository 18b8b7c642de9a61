use serde::Deserialize;

/// A container group as returned by the ARM `containerGroups` GET endpoint.
///
/// Only the fields the monitor reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerGroup {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub properties: ContainerGroupProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerGroupProperties {
    /// Coarse ARM provisioning status ("Creating", "Succeeded", ...).
    #[serde(default)]
    pub provisioning_state: Option<String>,

    #[serde(default)]
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Container {
    pub name: String,

    #[serde(default)]
    pub properties: ContainerProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProperties {
    #[serde(default)]
    pub instance_view: Option<InstanceView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    #[serde(default)]
    pub current_state: Option<ContainerState>,
}

/// Detailed runtime state reported by the container runtime.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerState {
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub exit_code: Option<i32>,

    #[serde(default)]
    pub detail_status: Option<String>,

    /// Timestamps are kept as the text ARM sent; they are only displayed.
    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub finish_time: Option<String>,
}

/// Body of the container `logs` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerLogs {
    #[serde(default)]
    pub content: Option<String>,
}

impl ContainerGroup {
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties.provisioning_state.as_deref()
    }

    /// The first container of the group, which runs the image build.
    pub fn first_container(&self) -> Option<&Container> {
        self.properties.containers.first()
    }

    pub fn current_state(&self) -> Option<&ContainerState> {
        self.first_container()?
            .properties
            .instance_view
            .as_ref()?
            .current_state
            .as_ref()
    }
}
