use strum::Display;

/// Container state that means the build will not change state again.
pub const TERMINATED: &str = "Terminated";

/// State reported before the first successful poll of a build.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Process exit status used when a build terminated without an exit code.
pub const UNKNOWN_EXIT_CODE: i32 = 1;

/// Aggregate outcome of a build, derived from its exit code.
///
/// The display form is the value written to the `build_result` CI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BuildOutcome {
    #[strum(serialize = "success")]
    Succeeded,
    #[strum(serialize = "failure")]
    Failed,
    #[strum(serialize = "unknown")]
    Unknown,
}

/// Result of a single image build, overwritten by every successful poll.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub image_name: String,
    pub state: String,
    pub exit_code: Option<i32>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub detail_status: Option<String>,

    /// Last lines of the build log, captured when the build terminated.
    pub logs_tail: String,

    /// Web console link supplied by the caller.
    pub portal_url: Option<String>,
}

impl BuildResult {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            state: UNKNOWN_STATE.to_string(),
            exit_code: None,
            start_time: None,
            finish_time: None,
            detail_status: None,
            logs_tail: String::new(),
            portal_url: None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state == TERMINATED
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn failed(&self) -> bool {
        matches!(self.exit_code, Some(code) if code != 0)
    }

    pub fn outcome(&self) -> BuildOutcome {
        match self.exit_code {
            Some(0) => BuildOutcome::Succeeded,
            Some(_) => BuildOutcome::Failed,
            None => BuildOutcome::Unknown,
        }
    }

    /// Exit status a process should report for this build.
    ///
    /// A missing exit code is never reported as success.
    pub fn process_exit_code(&self) -> i32 {
        self.exit_code.unwrap_or(UNKNOWN_EXIT_CODE)
    }
}
