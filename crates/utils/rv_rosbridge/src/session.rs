//! Connection lifecycle state machine.
//!
//! Pure event → action logic for one bridge connection: connect, transport
//! open, transport failure, fixed-delay retry, explicit shutdown. The async
//! driver feeds transport events in and executes the returned actions;
//! nothing here touches a socket or a timer, so the reconnect policy is
//! testable without either.

use std::time::Duration;

/// Connection lifecycle states, observable by an external status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Transport-level happenings fed into the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The caller asked for the initial connect.
    ConnectRequested,

    /// The transport session opened.
    TransportOpen,

    /// The transport closed or errored. The reason is reported to the
    /// status callback, never acted on: a rejected session and an
    /// unreachable server follow the same retry policy.
    TransportFailed(String),

    /// The scheduled retry delay elapsed.
    RetryElapsed,

    /// Caller-initiated teardown.
    ShutdownRequested,
}

/// Side effects the driver must perform after handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Open a new transport session to the endpoint.
    OpenTransport,

    /// The session is up; subscriptions and publishers must be
    /// (re)established. Fired on every open, not just the first.
    EmitReady,

    /// Report a state transition, with a human-readable reason.
    NotifyStatus(LinkState, String),

    /// Arm the one-shot reconnect timer.
    ScheduleRetry(Duration),

    /// Disarm a pending reconnect timer.
    CancelRetry,
}

/// Reconnect policy and current state for one bridge connection.
///
/// The retry delay is fixed: no backoff growth, no attempt cap. The client
/// redials until [`LinkEvent::ShutdownRequested`] arrives.
#[derive(Debug)]
pub struct LinkStateMachine {
    state: LinkState,
    retry_delay: Duration,
    shutting_down: bool,
}

impl LinkStateMachine {
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            state: LinkState::Disconnected,
            retry_delay,
            shutting_down: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Advance the machine, returning the actions the driver must execute.
    pub fn handle(&mut self, event: LinkEvent) -> Vec<LinkAction> {
        match event {
            LinkEvent::ConnectRequested | LinkEvent::RetryElapsed => {
                if self.shutting_down || self.state != LinkState::Disconnected {
                    return Vec::new();
                }
                self.state = LinkState::Connecting;
                vec![
                    LinkAction::NotifyStatus(
                        LinkState::Connecting,
                        "connecting to bridge".to_owned(),
                    ),
                    LinkAction::OpenTransport,
                ]
            }
            LinkEvent::TransportOpen => {
                if self.state != LinkState::Connecting {
                    return Vec::new();
                }
                self.state = LinkState::Connected;
                vec![
                    LinkAction::NotifyStatus(
                        LinkState::Connected,
                        "connected to bridge".to_owned(),
                    ),
                    LinkAction::EmitReady,
                ]
            }
            LinkEvent::TransportFailed(reason) => {
                if self.state == LinkState::Disconnected {
                    return Vec::new();
                }
                self.state = LinkState::Disconnected;
                let mut actions = vec![LinkAction::NotifyStatus(LinkState::Disconnected, reason)];
                if !self.shutting_down {
                    actions.push(LinkAction::ScheduleRetry(self.retry_delay));
                }
                actions
            }
            LinkEvent::ShutdownRequested => {
                self.shutting_down = true;
                let prior = self.state;
                self.state = LinkState::Disconnected;
                let mut actions = vec![LinkAction::CancelRetry];
                if prior != LinkState::Disconnected {
                    actions.push(LinkAction::NotifyStatus(
                        LinkState::Disconnected,
                        "shutdown requested".to_owned(),
                    ));
                }
                actions
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(3000);

    fn machine() -> LinkStateMachine {
        LinkStateMachine::new(DELAY)
    }

    fn open_count(actions: &[LinkAction]) -> usize {
        actions
            .iter()
            .filter(|a| **a == LinkAction::OpenTransport)
            .count()
    }

    #[test]
    fn test_connect_opens_transport() {
        let mut m = machine();
        let actions = m.handle(LinkEvent::ConnectRequested);
        assert_eq!(m.state(), LinkState::Connecting);
        assert_eq!(open_count(&actions), 1);
        assert!(actions.contains(&LinkAction::NotifyStatus(
            LinkState::Connecting,
            "connecting to bridge".to_owned()
        )));
    }

    #[test]
    fn test_open_reaches_connected_and_emits_ready() {
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        let actions = m.handle(LinkEvent::TransportOpen);
        assert_eq!(m.state(), LinkState::Connected);
        assert!(actions.contains(&LinkAction::EmitReady));
    }

    #[test]
    fn test_failure_schedules_single_retry() {
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        m.handle(LinkEvent::TransportOpen);
        let actions = m.handle(LinkEvent::TransportFailed("connection closed".to_owned()));
        assert_eq!(m.state(), LinkState::Disconnected);
        assert_eq!(
            actions
                .iter()
                .filter(|a| matches!(a, LinkAction::ScheduleRetry(d) if *d == DELAY))
                .count(),
            1
        );
    }

    #[test]
    fn test_first_attempt_failure_also_retries() {
        // A refused dial never leaves Connecting; the policy is the same.
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        let actions = m.handle(LinkEvent::TransportFailed("connect failed".to_owned()));
        assert!(actions.contains(&LinkAction::ScheduleRetry(DELAY)));
    }

    #[test]
    fn test_retry_elapsed_reconnects_exactly_once() {
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        m.handle(LinkEvent::TransportOpen);
        m.handle(LinkEvent::TransportFailed("connection closed".to_owned()));

        let actions = m.handle(LinkEvent::RetryElapsed);
        assert_eq!(open_count(&actions), 1);
        assert_eq!(m.state(), LinkState::Connecting);

        // A stale timer firing again must not dial a second time.
        let actions = m.handle(LinkEvent::RetryElapsed);
        assert_eq!(open_count(&actions), 0);
    }

    #[test]
    fn test_shutdown_cancels_pending_retry() {
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        m.handle(LinkEvent::TransportOpen);
        m.handle(LinkEvent::TransportFailed("connection closed".to_owned()));

        let actions = m.handle(LinkEvent::ShutdownRequested);
        assert!(actions.contains(&LinkAction::CancelRetry));
        assert!(m.is_shutting_down());

        // A timer that already fired must not resurrect the connection.
        assert!(m.handle(LinkEvent::RetryElapsed).is_empty());
    }

    #[test]
    fn test_shutdown_while_connected_notifies() {
        let mut m = machine();
        m.handle(LinkEvent::ConnectRequested);
        m.handle(LinkEvent::TransportOpen);
        let actions = m.handle(LinkEvent::ShutdownRequested);
        assert!(actions.contains(&LinkAction::NotifyStatus(
            LinkState::Disconnected,
            "shutdown requested".to_owned()
        )));
    }

    #[test]
    fn test_failure_while_disconnected_is_ignored() {
        let mut m = machine();
        assert!(m
            .handle(LinkEvent::TransportFailed("spurious".to_owned()))
            .is_empty());
    }

    #[test]
    fn test_open_while_disconnected_is_ignored() {
        let mut m = machine();
        assert!(m.handle(LinkEvent::TransportOpen).is_empty());
        assert_eq!(m.state(), LinkState::Disconnected);
    }
}
