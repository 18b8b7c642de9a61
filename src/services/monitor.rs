use metrics::{counter, gauge};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::MonitorSettings;
use crate::models::build_result::{BuildOutcome, BuildResult};
use crate::services::aci::ContainerClient;
use crate::services::github::CiEnvironment;
use crate::services::log_stream::stream_log_delta;
use crate::services::status::poll_build;

/// Polls image builds until they terminate, streaming their logs to a console.
///
/// Builds are polled one after another within a sweep; the only pause is the
/// poll interval between sweeps. There is no overall timeout.
pub struct BuildMonitor {
    client: Arc<dyn ContainerClient>,
    env: Arc<dyn CiEnvironment>,
    console: Box<dyn Write + Send>,
    settings: MonitorSettings,
}

impl BuildMonitor {
    pub fn new(
        client: Arc<dyn ContainerClient>,
        env: Arc<dyn CiEnvironment>,
        console: Box<dyn Write + Send>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            client,
            env,
            console,
            settings,
        }
    }

    /// Wait for every build to terminate and return the results in input order.
    pub async fn wait_for_builds(
        &mut self,
        resource_group: &str,
        image_names: &[String],
        portal_urls: &HashMap<String, String>,
    ) -> Vec<BuildResult> {
        let mut images: Vec<&str> = Vec::with_capacity(image_names.len());
        for name in image_names {
            if !images.contains(&name.as_str()) {
                images.push(name);
            }
        }

        let use_groups = images.len() > 1 && self.env.is_ci();

        let mut log_offsets: HashMap<&str, usize> = images.iter().map(|name| (*name, 0)).collect();
        let mut completed: HashSet<&str> = HashSet::new();
        let mut results: HashMap<&str, BuildResult> = HashMap::new();

        info!(count = images.len(), "Waiting for builds to complete");

        while completed.len() < images.len() {
            for &name in &images {
                if completed.contains(name) {
                    continue;
                }

                counter!("build_monitor_polls_total").increment(1);
                let polled = poll_build(
                    self.client.as_ref(),
                    resource_group,
                    name,
                    self.settings.tail_lines,
                )
                .await;

                let (mut result, full_logs) = match polled {
                    Ok(polled) => polled,
                    Err(e) => {
                        counter!("build_monitor_poll_errors_total").increment(1);
                        warn!(image = name, error = %e, "Error polling build, will retry");
                        continue;
                    }
                };

                result.portal_url = portal_urls.get(name).cloned();

                let offset = log_offsets.entry(name).or_insert(0);
                *offset = self.stream(name, &full_logs, *offset, use_groups);

                if result.is_terminated() {
                    completed.insert(name);
                    counter!(
                        "build_monitor_builds_finished_total",
                        "outcome" => result.outcome().to_string()
                    )
                    .increment(1);
                    self.console_line(&format!("{}: build {}", name, completion_status(&result)));
                }

                results.insert(name, result);
            }

            let pending: Vec<&str> = images
                .iter()
                .copied()
                .filter(|name| !completed.contains(name))
                .collect();
            gauge!("build_monitor_pending_builds").set(pending.len() as f64);

            if !pending.is_empty() {
                info!(
                    pending = %pending.join(", "),
                    "Waiting for {} build(s)",
                    pending.len()
                );
                sleep(self.settings.poll_interval).await;
            }
        }

        image_names
            .iter()
            .map(|name| {
                results
                    .get(name.as_str())
                    .cloned()
                    .unwrap_or_else(|| BuildResult::new(name.as_str()))
            })
            .collect()
    }

    /// Stream one build's logs until it terminates and return its exit status.
    pub async fn follow_image_logs(&mut self, resource_group: &str, image_name: &str) -> i32 {
        let mut log_offset = 0;

        info!(image = image_name, "Following logs");

        loop {
            let polled = poll_build(
                self.client.as_ref(),
                resource_group,
                image_name,
                self.settings.tail_lines,
            )
            .await;

            match polled {
                Ok((result, full_logs)) => {
                    log_offset = self.stream(image_name, &full_logs, log_offset, false);

                    if result.is_terminated() {
                        self.console_line("");
                        self.console_line(&format!(
                            "{}: build {}",
                            image_name,
                            completion_status(&result)
                        ));
                        if let Some(detail) = &result.detail_status {
                            self.console_line(&format!("  Detail: {}", detail));
                        }
                        return result.process_exit_code();
                    }
                }
                Err(e) => {
                    warn!(image = image_name, error = %e, "Error polling build, will retry");
                }
            }

            sleep(self.settings.poll_interval).await;
        }
    }

    fn stream(&mut self, image_name: &str, full_logs: &str, offset: usize, use_groups: bool) -> usize {
        match stream_log_delta(&mut *self.console, image_name, full_logs, offset, use_groups) {
            Ok(new_offset) => new_offset,
            Err(e) => {
                warn!(image = image_name, error = %e, "Failed to write build log");
                offset
            }
        }
    }

    fn console_line(&mut self, line: &str) {
        let written = writeln!(self.console, "{}", line).and_then(|_| self.console.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to write to console");
        }
    }
}

fn completion_status(result: &BuildResult) -> String {
    match result.outcome() {
        BuildOutcome::Succeeded => "succeeded".to_string(),
        BuildOutcome::Failed => format!("FAILED (exit code {})", result.process_exit_code()),
        BuildOutcome::Unknown => "finished with unknown exit code".to_string(),
    }
}
