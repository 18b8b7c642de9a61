use bake_monitor::{
    config::AppConfig,
    services::{aci::AciClient, github::ProcessEnv, monitor::BuildMonitor},
    telemetry,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    telemetry::init_tracing(config.log_json);

    let image_name = match config.image_names().as_slice() {
        [name] => name.clone(),
        names => {
            tracing::error!(count = names.len(), "IMAGES must name exactly one image to follow");
            return ExitCode::from(2);
        }
    };

    let client = AciClient::new(
        &config.arm_endpoint,
        &config.azure_subscription_id,
        &config.azure_access_token,
        &config.aci_api_version,
    );

    let mut monitor = BuildMonitor::new(
        Arc::new(client),
        Arc::new(ProcessEnv),
        Box::new(std::io::stdout()),
        config.settings(),
    );

    let exit_code = monitor
        .follow_image_logs(&config.resource_group, &image_name)
        .await;

    // Exit statuses outside a byte would wrap, possibly to success
    match exit_code {
        0 => ExitCode::SUCCESS,
        code => ExitCode::from(u8::try_from(code).unwrap_or(1)),
    }
}
