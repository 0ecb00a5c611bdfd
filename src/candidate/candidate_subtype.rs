use std::fmt;

use serde::Serialize;

use super::{Candidate, CandidateType};

/// The display subtype of a candidate, folding mDNS-obscured host
/// candidates into their own kind.
///
/// Badges, filters and export all derive from this one classification so
/// they can never disagree.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CandidateSubtype {
    #[default]
    #[serde(rename = "unspecified")]
    Unspecified,
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "srflx")]
    Srflx,
    #[serde(rename = "prflx")]
    Prflx,
    #[serde(rename = "relay")]
    Relay,
    #[serde(rename = "mdns")]
    Mdns,
}

const CANDIDATE_SUBTYPE_HOST_STR: &str = "host";
const CANDIDATE_SUBTYPE_SRFLX_STR: &str = "srflx";
const CANDIDATE_SUBTYPE_PRFLX_STR: &str = "prflx";
const CANDIDATE_SUBTYPE_RELAY_STR: &str = "relay";
const CANDIDATE_SUBTYPE_MDNS_STR: &str = "mdns";

/// takes a string and converts it to CandidateSubtype
impl From<&str> for CandidateSubtype {
    fn from(raw: &str) -> Self {
        match raw {
            CANDIDATE_SUBTYPE_HOST_STR => CandidateSubtype::Host,
            CANDIDATE_SUBTYPE_SRFLX_STR => CandidateSubtype::Srflx,
            CANDIDATE_SUBTYPE_PRFLX_STR => CandidateSubtype::Prflx,
            CANDIDATE_SUBTYPE_RELAY_STR => CandidateSubtype::Relay,
            CANDIDATE_SUBTYPE_MDNS_STR => CandidateSubtype::Mdns,
            _ => CandidateSubtype::Unspecified,
        }
    }
}

impl From<CandidateType> for CandidateSubtype {
    fn from(typ: CandidateType) -> Self {
        match typ {
            CandidateType::Host => CandidateSubtype::Host,
            CandidateType::ServerReflexive => CandidateSubtype::Srflx,
            CandidateType::PeerReflexive => CandidateSubtype::Prflx,
            CandidateType::Relay => CandidateSubtype::Relay,
            CandidateType::Unspecified => CandidateSubtype::Unspecified,
        }
    }
}

impl fmt::Display for CandidateSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CandidateSubtype::Host => write!(f, "{CANDIDATE_SUBTYPE_HOST_STR}"),
            CandidateSubtype::Srflx => write!(f, "{CANDIDATE_SUBTYPE_SRFLX_STR}"),
            CandidateSubtype::Prflx => write!(f, "{CANDIDATE_SUBTYPE_PRFLX_STR}"),
            CandidateSubtype::Relay => write!(f, "{CANDIDATE_SUBTYPE_RELAY_STR}"),
            CandidateSubtype::Mdns => write!(f, "{CANDIDATE_SUBTYPE_MDNS_STR}"),
            _ => write!(f, "Unspecified"),
        }
    }
}

/// Derives the display subtype for a candidate.
pub fn classify(candidate: &Candidate) -> CandidateSubtype {
    if candidate.is_obscured() {
        CandidateSubtype::Mdns
    } else {
        candidate.typ.into()
    }
}
