use serde::{Deserialize, Serialize};

/// Canonical job lifecycle status.
///
/// Moves forward only: `Unset → Pending → Started` and from `Started` into
/// exactly one of the four terminal outcomes. Terminal states never
/// transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unset,
    Pending,
    Started,
    Succeeded,
    PartiallySucceeded,
    Failed,
    Error,
}

/// Exclusive lower sentinel for integer status codes on the wire.
pub const STATUS_CODE_FLOOR: i64 = 0;
/// Exclusive upper sentinel for integer status codes on the wire.
pub const STATUS_CODE_CEIL: i64 = 7;

impl JobStatus {
    /// Integer wire code. `Unset` sits on the lower sentinel and is
    /// therefore never accepted from the wire.
    pub fn code(self) -> i64 {
        match self {
            JobStatus::Unset => 0,
            JobStatus::Pending => 1,
            JobStatus::Started => 2,
            JobStatus::Succeeded => 3,
            JobStatus::PartiallySucceeded => 4,
            JobStatus::Failed => 5,
            JobStatus::Error => 6,
        }
    }

    /// Decode an integer wire code, accepted only strictly between the
    /// sentinel bounds.
    pub fn from_code(code: i64) -> Option<Self> {
        if code <= STATUS_CODE_FLOOR || code >= STATUS_CODE_CEIL {
            return None;
        }
        match code {
            1 => Some(JobStatus::Pending),
            2 => Some(JobStatus::Started),
            3 => Some(JobStatus::Succeeded),
            4 => Some(JobStatus::PartiallySucceeded),
            5 => Some(JobStatus::Failed),
            6 => Some(JobStatus::Error),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JobStatus::Unset => "unset",
            JobStatus::Pending => "pending",
            JobStatus::Started => "started",
            JobStatus::Succeeded => "succeeded",
            JobStatus::PartiallySucceeded => "partially_succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Error => "error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(JobStatus::Pending),
            "started" => Some(JobStatus::Started),
            "succeeded" => Some(JobStatus::Succeeded),
            "partially_succeeded" => Some(JobStatus::PartiallySucceeded),
            "failed" => Some(JobStatus::Failed),
            "error" => Some(JobStatus::Error),
            _ => None,
        }
    }

    /// One of the four mutually exclusive outcomes.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded
                | JobStatus::PartiallySucceeded
                | JobStatus::Failed
                | JobStatus::Error
        )
    }

    /// Position in the forward-only lifecycle. Terminal states share a rank:
    /// they are alternatives, not a sequence.
    fn rank(self) -> u8 {
        match self {
            JobStatus::Unset => 0,
            JobStatus::Pending => 1,
            JobStatus::Started => 2,
            _ => 3,
        }
    }

    /// Whether observing `next` after `self` is a legal forward move.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Started,
            JobStatus::Succeeded,
            JobStatus::PartiallySucceeded,
            JobStatus::Failed,
            JobStatus::Error,
        ] {
            assert_eq!(JobStatus::from_code(status.code()), Some(status));
            assert_eq!(JobStatus::from_name(status.name()), Some(status));
        }
    }

    #[test]
    fn sentinel_bounds_are_exclusive() {
        assert_eq!(JobStatus::from_code(STATUS_CODE_FLOOR), None);
        assert_eq!(JobStatus::from_code(STATUS_CODE_CEIL), None);
        assert_eq!(JobStatus::from_code(-1), None);
        assert_eq!(JobStatus::from_code(42), None);
    }

    #[test]
    fn unset_is_not_on_the_wire() {
        assert_eq!(JobStatus::from_code(JobStatus::Unset.code()), None);
        assert_eq!(JobStatus::from_name("unset"), None);
    }

    #[test]
    fn forward_transitions() {
        assert!(JobStatus::Unset.can_transition_to(JobStatus::Pending));
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Started));
        assert!(JobStatus::Started.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Succeeded));
    }

    #[test]
    fn terminal_states_never_move() {
        for terminal in [
            JobStatus::Succeeded,
            JobStatus::PartiallySucceeded,
            JobStatus::Failed,
            JobStatus::Error,
        ] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(JobStatus::Pending));
            assert!(!terminal.can_transition_to(JobStatus::Started));
            for other in [
                JobStatus::Succeeded,
                JobStatus::PartiallySucceeded,
                JobStatus::Failed,
                JobStatus::Error,
            ] {
                if other != terminal {
                    assert!(!terminal.can_transition_to(other));
                }
            }
        }
    }

    #[test]
    fn no_regression_to_earlier_states() {
        assert!(!JobStatus::Started.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Unset));
    }
}
