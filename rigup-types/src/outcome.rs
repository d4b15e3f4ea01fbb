use crate::step::StepId;

/// Result of an executed (not skipped) step action.
///
/// A soft warning means an optional sub-operation failed: the step still
/// counts as succeeded, but the message is logged with a distinct marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Warned(String),
}

/// Fatal failure of a step action. Any of these halts the entire run.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("unsupported operating system '{os}' (rigup supports macos and linux)")]
    UnsupportedOs { os: String },

    #[error("required command '{name}' not found on PATH")]
    MissingCommand { name: &'static str },

    #[error("no usable SSH credential found\n{guidance}")]
    NoSshCredential { guidance: String },

    #[error("could not confirm GitHub SSH authentication: {detail}")]
    RemoteAuthFailed { detail: String },

    #[error("'{program}' failed while {what}: {detail}")]
    CommandFailed {
        program: String,
        what: String,
        detail: String,
    },

    #[error("installed {name} but it still cannot be located on PATH")]
    InstallUnverified { name: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Per-step status as recorded in a run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Skipped,
    Succeeded,
    SucceededWithWarning(String),
    Failed(String),
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded | StepStatus::SucceededWithWarning(_)
        )
    }
}

/// One entry of a run summary, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: StepId,
    pub status: StepStatus,
}

/// Everything that happened during one run, in order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub records: Vec<StepRecord>,
}

impl RunSummary {
    pub fn record(&mut self, step: StepId, status: StepStatus) {
        self.records.push(StepRecord { step, status });
    }

    /// Steps whose actions actually ran and succeeded, in order.
    pub fn executed(&self) -> Vec<StepId> {
        self.records
            .iter()
            .filter(|r| r.status.is_success())
            .map(|r| r.step)
            .collect()
    }

    pub fn skipped(&self) -> Vec<StepId> {
        self.records
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .map(|r| r.step)
            .collect()
    }

    pub fn warnings(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, StepStatus::SucceededWithWarning(_)))
            .count()
    }
}
