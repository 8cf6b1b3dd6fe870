//! The five-value progress domain.
//!
//! Progress is deliberately coarse: every provider-side intermediate
//! status collapses into [`JobState::Running`]. The wire contract
//! predates this codebase and is kept as-is (`-1` for failure, `100`
//! for success).

use serde::{Deserialize, Serialize};

/// Lifecycle state of a render job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job record created; payload not yet handed to the provider.
    Submitted,
    /// Provider accepted the submission and assigned a correlation id.
    Accepted,
    /// Provider reports the job as queued or running.
    Running,
    /// Terminal: provider produced a result and it has been resolved.
    Succeeded,
    /// Terminal: submission or execution failed.
    Failed,
}

impl JobState {
    /// Legacy wire percentage for this state.
    ///
    /// Note the conflation baked into the wire contract: `-1` means
    /// "failed", but the progress endpoint also answers `-1` for jobs
    /// it has never heard of. Callers that need to tell the two apart
    /// should use the state name, not the percent.
    pub const fn percent(self) -> i32 {
        match self {
            Self::Submitted => 5,
            Self::Accepted => 20,
            Self::Running => 50,
            Self::Succeeded => 100,
            Self::Failed => -1,
        }
    }

    /// Ordering rank used by the monotonic store.
    ///
    /// Ranks are ordered by lifecycle, not by wire percent: `Failed`
    /// outranks `Running` even though its percent is `-1`. The two
    /// terminal states share the maximal rank so neither can replace
    /// the other.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Submitted => 0,
            Self::Accepted => 1,
            Self::Running => 2,
            Self::Succeeded | Self::Failed => 3,
        }
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether the monotonic rule permits replacing `self` with `next`.
    pub const fn can_advance_to(self, next: Self) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Stable lowercase name, used as the `state` field on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_legacy_values() {
        assert_eq!(JobState::Submitted.percent(), 5);
        assert_eq!(JobState::Accepted.percent(), 20);
        assert_eq!(JobState::Running.percent(), 50);
        assert_eq!(JobState::Succeeded.percent(), 100);
        assert_eq!(JobState::Failed.percent(), -1);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(JobState::Submitted.can_advance_to(JobState::Accepted));
        assert!(JobState::Accepted.can_advance_to(JobState::Running));
        assert!(JobState::Running.can_advance_to(JobState::Succeeded));
        assert!(JobState::Running.can_advance_to(JobState::Failed));
        assert!(JobState::Submitted.can_advance_to(JobState::Failed));
    }

    #[test]
    fn backward_and_lateral_transitions_are_rejected() {
        assert!(!JobState::Running.can_advance_to(JobState::Accepted));
        assert!(!JobState::Accepted.can_advance_to(JobState::Submitted));
        assert!(!JobState::Running.can_advance_to(JobState::Running));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [JobState::Succeeded, JobState::Failed] {
            for next in [
                JobState::Submitted,
                JobState::Accepted,
                JobState::Running,
                JobState::Succeeded,
                JobState::Failed,
            ] {
                assert!(!terminal.can_advance_to(next));
            }
        }
    }

    #[test]
    fn failed_outranks_running_despite_negative_percent() {
        assert!(JobState::Running.can_advance_to(JobState::Failed));
        assert!(JobState::Failed.percent() < JobState::Running.percent());
    }
}
