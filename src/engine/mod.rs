use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub type OnCandidateLineHdlrFn = Box<
    dyn (FnMut(Option<String>) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

pub type OnEngineStateChangeHdlrFn = Box<
    dyn (FnMut(EngineGatheringState) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

/// EngineGatheringState describes where the external engine is in its
/// candidate gathering process.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineGatheringState {
    /// The engine has been created but gathering has not begun.
    #[default]
    New,

    /// The engine is actively emitting candidates.
    Gathering,

    /// The engine will emit no further candidates.
    Complete,
}

const ENGINE_GATHERING_STATE_NEW_STR: &str = "new";
const ENGINE_GATHERING_STATE_GATHERING_STR: &str = "gathering";
const ENGINE_GATHERING_STATE_COMPLETE_STR: &str = "complete";

/// takes a string and converts it to EngineGatheringState
impl From<&str> for EngineGatheringState {
    fn from(raw: &str) -> Self {
        match raw {
            ENGINE_GATHERING_STATE_NEW_STR => EngineGatheringState::New,
            ENGINE_GATHERING_STATE_GATHERING_STR => EngineGatheringState::Gathering,
            ENGINE_GATHERING_STATE_COMPLETE_STR => EngineGatheringState::Complete,
            _ => EngineGatheringState::New,
        }
    }
}

impl fmt::Display for EngineGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EngineGatheringState::New => write!(f, "{ENGINE_GATHERING_STATE_NEW_STR}"),
            EngineGatheringState::Gathering => {
                write!(f, "{ENGINE_GATHERING_STATE_GATHERING_STR}")
            }
            EngineGatheringState::Complete => {
                write!(f, "{ENGINE_GATHERING_STATE_COMPLETE_STR}")
            }
        }
    }
}

/// The connection object of the external ICE engine, as consumed by the
/// probe. The probe drives the offer/local-description negotiation and then
/// listens; it never performs STUN/TURN work itself.
#[async_trait]
pub trait GatheringEngine {
    /// Creates the local offer that primes candidate gathering.
    async fn create_offer(&self) -> Result<String>;

    /// Applies the offer locally. Gathering begins once this succeeds.
    async fn set_local_description(&self, offer: String) -> Result<()>;

    /// Sets the handler called once per emitted candidate attribute line,
    /// then with `None` when the engine has no more candidates.
    fn on_candidate_line(&self, f: OnCandidateLineHdlrFn);

    /// Sets the handler called on gathering-state notifications.
    fn on_gathering_state_change(&self, f: OnEngineStateChangeHdlrFn);

    /// Releases the underlying connection. Must tolerate repeated calls.
    async fn close(&self) -> Result<()>;
}

/// Opens fresh engine connections, one per gathering session.
#[async_trait]
pub trait GatheringEngineFactory {
    /// Opens a gathering pipeline pointed at the given STUN server.
    async fn create_engine(
        &self,
        stun_url: &str,
    ) -> Result<Arc<dyn GatheringEngine + Send + Sync>>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_engine_gathering_state() {
        let tests = vec![
            ("new", EngineGatheringState::New),
            ("gathering", EngineGatheringState::Gathering),
            ("complete", EngineGatheringState::Complete),
            ("unknown", EngineGatheringState::New),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(EngineGatheringState::from(state_string), expected_state);
        }
    }

    #[test]
    fn test_engine_gathering_state_string() {
        let tests = vec![
            (EngineGatheringState::New, "new"),
            (EngineGatheringState::Gathering, "gathering"),
            (EngineGatheringState::Complete, "complete"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
        }
    }
}
