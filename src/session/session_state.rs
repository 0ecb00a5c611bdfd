use std::fmt;

/// SessionState describes the lifecycle of one gathering session.
///
/// `Complete`, `TimedOut`, `Stopped` and `Failed` are terminal: only an
/// explicit `reset()` returns the session to `Idle`.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No probe is underway.
    #[default]
    Idle,

    /// start() succeeded and engine negotiation is in flight.
    Starting,

    /// The engine is emitting candidate notifications.
    Collecting,

    /// The engine signaled that no further candidates will arrive.
    Complete,

    /// The deadline elapsed before the completion signal. Candidates
    /// collected so far remain available.
    TimedOut,

    /// The caller stopped the session. Candidates collected so far remain
    /// available.
    Stopped,

    /// Engine negotiation failed.
    Failed,
}

const SESSION_STATE_IDLE_STR: &str = "idle";
const SESSION_STATE_STARTING_STR: &str = "starting";
const SESSION_STATE_COLLECTING_STR: &str = "collecting";
const SESSION_STATE_COMPLETE_STR: &str = "complete";
const SESSION_STATE_TIMED_OUT_STR: &str = "timed-out";
const SESSION_STATE_STOPPED_STR: &str = "stopped";
const SESSION_STATE_FAILED_STR: &str = "failed";

/// takes a string and converts it to SessionState
impl From<&str> for SessionState {
    fn from(raw: &str) -> Self {
        match raw {
            SESSION_STATE_STARTING_STR => SessionState::Starting,
            SESSION_STATE_COLLECTING_STR => SessionState::Collecting,
            SESSION_STATE_COMPLETE_STR => SessionState::Complete,
            SESSION_STATE_TIMED_OUT_STR => SessionState::TimedOut,
            SESSION_STATE_STOPPED_STR => SessionState::Stopped,
            SESSION_STATE_FAILED_STR => SessionState::Failed,
            _ => SessionState::Idle,
        }
    }
}

impl From<u8> for SessionState {
    fn from(v: u8) -> Self {
        match v {
            1 => SessionState::Starting,
            2 => SessionState::Collecting,
            3 => SessionState::Complete,
            4 => SessionState::TimedOut,
            5 => SessionState::Stopped,
            6 => SessionState::Failed,
            _ => SessionState::Idle,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SessionState::Idle => write!(f, "{SESSION_STATE_IDLE_STR}"),
            SessionState::Starting => write!(f, "{SESSION_STATE_STARTING_STR}"),
            SessionState::Collecting => write!(f, "{SESSION_STATE_COLLECTING_STR}"),
            SessionState::Complete => write!(f, "{SESSION_STATE_COMPLETE_STR}"),
            SessionState::TimedOut => write!(f, "{SESSION_STATE_TIMED_OUT_STR}"),
            SessionState::Stopped => write!(f, "{SESSION_STATE_STOPPED_STR}"),
            SessionState::Failed => write!(f, "{SESSION_STATE_FAILED_STR}"),
        }
    }
}

impl SessionState {
    /// Whether the session has finished and only reset() applies.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Complete
                | SessionState::TimedOut
                | SessionState::Stopped
                | SessionState::Failed
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_session_state() {
        let tests = vec![
            ("Unspecified", SessionState::Idle),
            ("idle", SessionState::Idle),
            ("starting", SessionState::Starting),
            ("collecting", SessionState::Collecting),
            ("complete", SessionState::Complete),
            ("timed-out", SessionState::TimedOut),
            ("stopped", SessionState::Stopped),
            ("failed", SessionState::Failed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(SessionState::from(state_string), expected_state);
        }
    }

    #[test]
    fn test_session_state_string() {
        let tests = vec![
            (SessionState::Idle, "idle"),
            (SessionState::Starting, "starting"),
            (SessionState::Collecting, "collecting"),
            (SessionState::Complete, "complete"),
            (SessionState::TimedOut, "timed-out"),
            (SessionState::Stopped, "stopped"),
            (SessionState::Failed, "failed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
        }
    }

    #[test]
    fn test_session_state_u8_round_trip() {
        let states = vec![
            SessionState::Idle,
            SessionState::Starting,
            SessionState::Collecting,
            SessionState::Complete,
            SessionState::TimedOut,
            SessionState::Stopped,
            SessionState::Failed,
        ];

        for state in states {
            assert_eq!(SessionState::from(state as u8), state);
        }
    }

    #[test]
    fn test_session_state_terminal() {
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Starting.is_terminal());
        assert!(!SessionState::Collecting.is_terminal());
        assert!(SessionState::Complete.is_terminal());
        assert!(SessionState::TimedOut.is_terminal());
        assert!(SessionState::Stopped.is_terminal());
        assert!(SessionState::Failed.is_terminal());
    }
}
