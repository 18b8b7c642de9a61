//! Container group payloads for each stage of an image build

#![allow(dead_code)]

use bake_monitor::models::container_group::ContainerGroup;
use serde_json::{json, Value};

fn parse(body: Value) -> ContainerGroup {
    serde_json::from_value(body).expect("fixture must match the container group model")
}

/// Group accepted by ARM but with no container created yet.
pub fn empty(name: &str) -> ContainerGroup {
    parse(json!({
        "name": name,
        "properties": { "provisioningState": "Pending", "containers": [] }
    }))
}

/// Container created, runtime has not reported a state yet.
pub fn creating(name: &str) -> ContainerGroup {
    parse(json!({
        "name": name,
        "properties": {
            "provisioningState": "Creating",
            "containers": [{ "name": "builder", "properties": {} }]
        }
    }))
}

pub fn running(name: &str) -> ContainerGroup {
    parse(json!({
        "name": name,
        "properties": {
            "provisioningState": "Succeeded",
            "containers": [{
                "name": "builder",
                "properties": {
                    "instanceView": {
                        "currentState": {
                            "state": "Running",
                            "startTime": "2026-01-01T00:00:00Z",
                            "detailStatus": ""
                        }
                    }
                }
            }]
        }
    }))
}

pub fn terminated(name: &str, exit_code: Option<i32>) -> ContainerGroup {
    let detail = match exit_code {
        Some(0) => "Completed",
        _ => "Error",
    };
    parse(json!({
        "name": name,
        "properties": {
            "provisioningState": "Succeeded",
            "containers": [{
                "name": "builder",
                "properties": {
                    "instanceView": {
                        "currentState": {
                            "state": "Terminated",
                            "exitCode": exit_code,
                            "startTime": "2026-01-01T00:00:00Z",
                            "finishTime": "2026-01-01T00:15:00Z",
                            "detailStatus": detail
                        }
                    }
                }
            }]
        }
    }))
}

/// Terminated group whose timestamps are passed through as given.
pub fn terminated_at(name: &str, exit_code: i32, start_time: &str, finish_time: &str) -> ContainerGroup {
    parse(json!({
        "name": name,
        "properties": {
            "provisioningState": "Succeeded",
            "containers": [{
                "name": "builder",
                "properties": {
                    "instanceView": {
                        "currentState": {
                            "state": "Terminated",
                            "exitCode": exit_code,
                            "startTime": start_time,
                            "finishTime": finish_time
                        }
                    }
                }
            }]
        }
    }))
}
