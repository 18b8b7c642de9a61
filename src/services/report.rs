use std::io::{self, Write};
use tracing::debug;

use crate::config::MonitorSettings;
use crate::models::build_result::{BuildOutcome, BuildResult};
use crate::services::github::{write_annotation, AnnotationLevel, CiEnvironment};

const BANNER_WIDTH: usize = 60;

/// Turns finished build results into a console summary and, under CI,
/// annotations, a job summary and step outputs.
pub struct Reporter<'a> {
    env: &'a dyn CiEnvironment,
    settings: MonitorSettings,
}

impl<'a> Reporter<'a> {
    pub fn new(env: &'a dyn CiEnvironment, settings: MonitorSettings) -> Self {
        Self { env, settings }
    }

    /// Report `results` and return the failed ones.
    pub fn report_results<W: Write + ?Sized>(
        &self,
        results: &[BuildResult],
        repo: Option<&str>,
        out: &mut W,
    ) -> Result<Vec<BuildResult>, ReportError> {
        if let Some(repo) = repo {
            debug!(repo, "Reporting build results");
        }

        let failed: Vec<&BuildResult> = results.iter().filter(|r| r.failed()).collect();
        let succeeded: Vec<&BuildResult> = results.iter().filter(|r| r.succeeded()).collect();

        write_console_summary(&mut *out, results)?;

        if self.env.is_ci() {
            for r in &failed {
                let tail = if r.logs_tail.is_empty() {
                    "(no logs available)"
                } else {
                    r.logs_tail.as_str()
                };
                write_annotation(
                    &mut *out,
                    AnnotationLevel::Error,
                    &format!(
                        "Build failed with exit code {}.\n\nLast {} lines:\n{}",
                        r.process_exit_code(),
                        self.settings.tail_lines,
                        tail
                    ),
                    Some(&format!("{} build failed", r.image_name)),
                )?;
            }

            for r in &succeeded {
                write_annotation(
                    &mut *out,
                    AnnotationLevel::Notice,
                    "Build completed successfully.",
                    Some(&format!("{} build succeeded", r.image_name)),
                )?;
            }

            self.env.write_summary(&markdown_summary(results))?;

            let build_result = if !failed.is_empty() {
                BuildOutcome::Failed
            } else if !succeeded.is_empty() {
                BuildOutcome::Succeeded
            } else {
                BuildOutcome::Unknown
            };
            self.env.write_output("build_result", &build_result.to_string())?;

            if !failed.is_empty() {
                self.env.write_output("failed_images", &join_names(&failed))?;
            }
            if !succeeded.is_empty() {
                self.env.write_output("succeeded_images", &join_names(&succeeded))?;
            }
        }

        Ok(failed.into_iter().cloned().collect())
    }
}

fn join_names(results: &[&BuildResult]) -> String {
    results
        .iter()
        .map(|r| r.image_name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn glyph(outcome: BuildOutcome) -> &'static str {
    match outcome {
        BuildOutcome::Succeeded => "✓",
        BuildOutcome::Failed => "✗",
        BuildOutcome::Unknown => "?",
    }
}

fn status_label(outcome: BuildOutcome) -> &'static str {
    match outcome {
        BuildOutcome::Succeeded => ":white_check_mark: Succeeded",
        BuildOutcome::Failed => ":x: Failed",
        BuildOutcome::Unknown => ":grey_question: Unknown",
    }
}

pub fn write_console_summary<W: Write + ?Sized>(
    out: &mut W,
    results: &[BuildResult],
) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "BUILD RESULTS")?;
    writeln!(out, "{}", rule)?;
    for r in results {
        let code = r
            .exit_code
            .map(|c| format!(" (exit code {})", c))
            .unwrap_or_default();
        writeln!(
            out,
            "  {} {}: {}{}",
            glyph(r.outcome()),
            r.image_name,
            r.state,
            code
        )?;
    }
    writeln!(out, "{}", rule)?;
    out.flush()
}

/// Markdown table of all results followed by the logs of failed builds.
pub fn markdown_summary(results: &[BuildResult]) -> String {
    let mut lines = vec![
        "## Build Results\n".to_string(),
        "| Image | Status | Exit Code | Details |".to_string(),
        "|-------|--------|-----------|---------|".to_string(),
    ];

    for r in results {
        let code = r
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let portal = r
            .portal_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| format!("[Portal]({})", url))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "| {} | {} | {} | {} |",
            r.image_name,
            status_label(r.outcome()),
            code,
            portal
        ));
    }
    lines.push(String::new());

    let failed: Vec<&BuildResult> = results.iter().filter(|r| r.failed()).collect();
    if !failed.is_empty() {
        lines.push("### Failure Logs\n".to_string());
        for r in failed {
            lines.push(format!("<details><summary>{}</summary>\n", r.image_name));
            lines.push(format!("```\n{}\n```\n", r.logs_tail));
            lines.push("</details>\n".to_string());
        }
    }

    lines.join("\n")
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write build report: {0}")]
    Io(#[from] io::Error),
}
