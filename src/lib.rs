//! Image build monitor
//!
//! This library watches image builds running as Azure Container Instances
//! container groups: it polls every build to completion, streams each build's
//! log output incrementally, and reports the results to the console and, when
//! running under GitHub Actions, as annotations, a job summary and step outputs.

pub mod config;
pub mod models;
pub mod services;
pub mod telemetry;
