use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates start() was given a URL whose scheme is not accepted.
    /// The comparison is case-sensitive.
    #[error("invalid STUN url scheme")]
    ErrSchemeType,

    /// Indicates start() was called while a session was already underway.
    #[error("attempted to start session twice")]
    ErrMultipleStart,

    /// Indicates reset() was called while candidates were still being
    /// gathered.
    #[error("session can not be reset while gathering")]
    ErrResetWhenGathering,

    /// Indicates the external engine failed while negotiating the offer or
    /// the local description. The session has transitioned to failed and
    /// released its resources.
    #[error("engine setup failed: {0}")]
    ErrEngineSetup(String),

    #[error("attribute is not an ICE candidate")]
    ErrNotACandidate,
    #[error("attribute not long enough to be ICE candidate")]
    ErrAttributeTooShortIceCandidate,
    #[error("could not parse port")]
    ErrParsePort,
    #[error("could not parse related addresses")]
    ErrParseRelatedAddr,
    #[error("candidate has no typ attribute")]
    ErrMissingType,
    #[error("unknown candidate type")]
    ErrUnknownCandidateType,

    #[error("{0}")]
    Other(String),
}
