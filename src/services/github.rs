//! GitHub Actions workflow commands and step outputs.
//!
//! See https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions

use std::fs::OpenOptions;
use std::io::{self, Write};
use strum::{AsRefStr, Display};

/// Environment flags whose presence means we run inside GitHub Actions.
const CI_FLAGS: [&str; 2] = ["GITHUB_ACTIONS", "GITHUB_ACTION"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AnnotationLevel {
    Error,
    Warning,
    Notice,
}

/// Files a workflow step can append to. The string form is the variable
/// holding the file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum OutputSink {
    #[strum(serialize = "GITHUB_OUTPUT")]
    Output,
    #[strum(serialize = "GITHUB_STEP_SUMMARY")]
    StepSummary,
}

/// Render an annotation as a single workflow command line (without newline).
pub fn format_annotation(level: AnnotationLevel, message: &str, title: Option<&str>) -> String {
    let title_part = title.map(|t| format!(" title={}", t)).unwrap_or_default();
    format!("::{}{}::{}", level, title_part, message.replace('\n', "%0A"))
}

pub fn write_annotation<W: Write + ?Sized>(
    out: &mut W,
    level: AnnotationLevel,
    message: &str,
    title: Option<&str>,
) -> io::Result<()> {
    writeln!(out, "{}", format_annotation(level, message, title))?;
    out.flush()
}

pub fn write_group_start<W: Write + ?Sized>(out: &mut W, label: &str) -> io::Result<()> {
    writeln!(out, "::group::{}", label)?;
    out.flush()
}

pub fn write_group_end<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "::endgroup::")?;
    out.flush()
}

/// Access to the CI environment: flags and the step output files.
pub trait CiEnvironment: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;

    fn append_file(&self, path: &str, text: &str) -> io::Result<()>;

    fn is_ci(&self) -> bool {
        CI_FLAGS
            .iter()
            .any(|flag| self.var(flag).is_some_and(|v| !v.is_empty()))
    }

    /// Append to a sink; a no-op when its path variable is unset.
    fn append(&self, sink: OutputSink, text: &str) -> io::Result<()> {
        match self.var(sink.as_ref()) {
            Some(path) if !path.is_empty() => self.append_file(&path, text),
            _ => Ok(()),
        }
    }

    /// Append a `key=value` pair for downstream steps.
    fn write_output(&self, key: &str, value: &str) -> io::Result<()> {
        self.append(OutputSink::Output, &format!("{}={}\n", key, value))
    }

    /// Append markdown to the job summary page.
    fn write_summary(&self, markdown: &str) -> io::Result<()> {
        self.append(OutputSink::StepSummary, &format!("{}\n", markdown))
    }
}

/// The real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl CiEnvironment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn append_file(&self, path: &str, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(text.as_bytes())
    }
}
