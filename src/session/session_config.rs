use std::time::Duration;

/// How long a session waits for the engine's completion signal before
/// transitioning to timed-out.
pub const DEFAULT_GATHER_TIMEOUT: Duration = Duration::from_secs(15);

/// URL scheme a probe target must carry. The comparison is case-sensitive.
pub const DEFAULT_URL_SCHEME: &str = "stun:";

/// Collects the arguments to `GatheringSession` construction into a single
/// structure, for future-proofness of the interface.
#[derive(Default)]
pub struct SessionConfig {
    /// Defaults to 15 seconds when this property is none.
    pub gather_timeout: Option<Duration>,

    /// Scheme prefix accepted by start(). Defaults to "stun:" when none.
    pub url_scheme: Option<String>,
}

impl SessionConfig {
    pub(crate) fn gather_timeout(&self) -> Duration {
        self.gather_timeout.unwrap_or(DEFAULT_GATHER_TIMEOUT)
    }

    pub(crate) fn url_scheme(&self) -> &str {
        self.url_scheme.as_deref().unwrap_or(DEFAULT_URL_SCHEME)
    }
}
