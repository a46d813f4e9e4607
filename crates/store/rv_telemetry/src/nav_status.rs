//! Navigation goal status tracking.

use crate::ros::actionlib_msgs::GoalStatusArray;

/// Status codes reported by the navigation action server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
    Preempting,
    Recalling,
    Recalled,
    Lost,

    /// Any numeric code outside the protocol's 0..=9 range.
    Unknown,
}

impl GoalStatus {
    /// Map a wire status code. Total: unmapped integers become `Unknown`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::Active,
            2 => Self::Preempted,
            3 => Self::Succeeded,
            4 => Self::Aborted,
            5 => Self::Rejected,
            6 => Self::Preempting,
            7 => Self::Recalling,
            8 => Self::Recalled,
            9 => Self::Lost,
            _ => Self::Unknown,
        }
    }

    /// Protocol name of the status.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Preempted => "PREEMPTED",
            Self::Succeeded => "SUCCEEDED",
            Self::Aborted => "ABORTED",
            Self::Rejected => "REJECTED",
            Self::Preempting => "PREEMPTING",
            Self::Recalling => "RECALLING",
            Self::Recalled => "RECALLED",
            Self::Lost => "LOST",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Signals emitted toward the operator UI on a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavSignal {
    /// The robot is actively navigating.
    Navigating,

    /// The goal was reached; the held goal has been cleared.
    GoalReached,

    /// The navigation attempt aborted or was rejected. The goal is left
    /// as-is; the caller decides whether to clear it.
    NavigationFailed,

    /// Any other status while a goal is held.
    StatusUpdate(&'static str),
}

impl std::fmt::Display for NavSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Navigating => write!(f, "navigating"),
            Self::GoalReached => write!(f, "goal reached"),
            Self::NavigationFailed => write!(f, "navigation failed"),
            Self::StatusUpdate(name) => write!(f, "status: {name}"),
        }
    }
}

/// Reactive tracker of the most recent goal status.
///
/// Holds only the last-seen status and the optionally-held goal position;
/// nothing survives a connection drop.
#[derive(Debug, Default)]
pub struct NavStatusMachine {
    last_status: Option<GoalStatus>,
    goal: Option<[f64; 2]>,
}

impl NavStatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goal(&self) -> Option<[f64; 2]> {
        self.goal
    }

    pub fn last_status(&self) -> Option<GoalStatus> {
        self.last_status
    }

    /// Record a newly published goal position.
    pub fn set_goal(&mut self, position: [f64; 2]) {
        self.goal = Some(position);
    }

    /// Drop the held goal (explicit cancel or clear).
    pub fn clear_goal(&mut self) {
        self.goal = None;
    }

    /// Forget everything, used when the connection drops.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Ingest a status report. Only the last entry of the list is
    /// authoritative (the most recent goal); an empty report is ignored.
    pub fn ingest(&mut self, array: &GoalStatusArray) -> Option<NavSignal> {
        let entry = array.status_list.last()?;
        let status = GoalStatus::from_code(entry.status);
        self.last_status = Some(status);

        match status {
            GoalStatus::Active => Some(NavSignal::Navigating),
            GoalStatus::Succeeded => {
                self.goal = None;
                Some(NavSignal::GoalReached)
            }
            GoalStatus::Aborted | GoalStatus::Rejected => Some(NavSignal::NavigationFailed),
            other => {
                // Suppressed while idle to avoid noisy updates.
                self.goal.is_some().then(|| NavSignal::StatusUpdate(other.name()))
            }
        }
    }
}
