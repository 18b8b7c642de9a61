use bake_monitor::{
    config::AppConfig,
    services::{aci::AciClient, github::ProcessEnv, monitor::BuildMonitor, report::Reporter},
    telemetry,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    telemetry::init_tracing(config.log_json);

    if let Some(addr) = &config.metrics_addr {
        let addr: SocketAddr = addr.parse().expect("Invalid METRICS_ADDR");
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .expect("Failed to install Prometheus metrics exporter");
        tracing::info!("Serving metrics on {}", addr);
    }

    metrics::describe_counter!("build_monitor_polls_total", "Build status polls issued");
    metrics::describe_counter!(
        "build_monitor_poll_errors_total",
        "Build status polls that failed and will be retried"
    );
    metrics::describe_counter!(
        "build_monitor_builds_finished_total",
        "Builds that reached the terminated state, by outcome"
    );
    metrics::describe_gauge!(
        "build_monitor_pending_builds",
        "Builds still running after the last sweep"
    );

    let images = config.image_names();
    let settings = config.settings();
    let portal_urls: HashMap<String, String> = images
        .iter()
        .filter_map(|name| config.portal_url(name).map(|url| (name.clone(), url)))
        .collect();

    tracing::info!(
        resource_group = %config.resource_group,
        images = %images.join(", "),
        "Monitoring image builds"
    );

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
        settings,
    );
    let results = monitor
        .wait_for_builds(&config.resource_group, &images, &portal_urls)
        .await;

    let reporter = Reporter::new(&ProcessEnv, settings);
    let mut stdout = std::io::stdout();
    if let Err(e) = reporter.report_results(&results, None, &mut stdout) {
        tracing::error!(error = %e, "Failed to report build results");
        return ExitCode::FAILURE;
    }

    if results.iter().all(|r| r.succeeded()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
