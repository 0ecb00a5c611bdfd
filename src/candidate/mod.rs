
pub mod candidate_subtype;

use std::fmt;

use serde::{Serialize, Serializer};
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::mdns::is_mdns_hostname;
use candidate_subtype::{classify, CandidateSubtype};

/// Indicates that the candidate is used for RTP.
pub const COMPONENT_RTP: &str = "1";
/// Indicates that the candidate is used for RTCP.
pub const COMPONENT_RTCP: &str = "2";

/// Represents the type of candidate `CandidateType` enum.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateType {
    #[default]
    #[serde(rename = "unspecified")]
    Unspecified,
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "srflx")]
    ServerReflexive,
    #[serde(rename = "prflx")]
    PeerReflexive,
    #[serde(rename = "relay")]
    Relay,
}

impl From<&str> for CandidateType {
    fn from(raw: &str) -> Self {
        match raw {
            "host" => Self::Host,
            "srflx" => Self::ServerReflexive,
            "prflx" => Self::PeerReflexive,
            "relay" => Self::Relay,
            _ => Self::Unspecified,
        }
    }
}

// String makes CandidateType printable
impl fmt::Display for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            CandidateType::Host => "host",
            CandidateType::ServerReflexive => "srflx",
            CandidateType::PeerReflexive => "prflx",
            CandidateType::Relay => "relay",
            CandidateType::Unspecified => "Unknown candidate type",
        };
        write!(f, "{s}")
    }
}

/// The transport over which a candidate was gathered.
///
/// Engines may emit transports beyond UDP and TCP; those are carried
/// through uppercased rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Udp,
    Tcp,
    Other(SmolStr),
}

impl From<&str> for TransportProtocol {
    fn from(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        match upper.as_str() {
            "UDP" => Self::Udp,
            "TCP" => Self::Tcp,
            _ => Self::Other(SmolStr::new(upper)),
        }
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportProtocol::Udp => "UDP",
            TransportProtocol::Tcp => "TCP",
            TransportProtocol::Other(other) => other.as_str(),
        };
        write!(f, "{s}")
    }
}

impl Serialize for TransportProtocol {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Priority as it appeared on the wire.
///
/// Kept as the original text when the token does not fit an unsigned
/// 32-bit integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Priority {
    Value(u32),
    Text(SmolStr),
}

impl Priority {
    pub fn value(&self) -> Option<u32> {
        match self {
            Priority::Value(v) => Some(*v),
            Priority::Text(_) => None,
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        match raw.parse::<u32>() {
            Ok(v) => Self::Value(v),
            Err(_) => Self::Text(SmolStr::new(raw)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Value(v) => write!(f, "{v}"),
            Priority::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Priority::Value(v) => serializer.serialize_u32(*v),
            Priority::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One candidate as emitted by the engine, immutable once parsed.
///
/// The fields mirror the candidate-attribute grammar: fixed-position
/// foundation/component/transport/priority/address/port, then the keyed
/// `typ`, `raddr` and `rport` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub foundation: String,
    pub component: String,
    pub protocol: TransportProtocol,
    pub priority: Priority,
    pub address: String,
    pub port: u16,
    pub typ: CandidateType,
    pub related_address: Option<String>,
    pub related_port: Option<u16>,
    /// The original attribute line, retained for exact export.
    pub raw: String,
}

impl Candidate {
    /// True when the engine replaced the interface address with an opaque
    /// mDNS name.
    pub fn is_obscured(&self) -> bool {
        is_mdns_hostname(&self.address)
    }

    /// The display subtype of this candidate. Folds obscured host
    /// candidates into [`CandidateSubtype::Mdns`].
    pub fn subtype(&self) -> CandidateSubtype {
        classify(self)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}:{}",
            self.protocol,
            self.subtype(),
            self.address,
            self.port
        )
    }
}

/// Creates a Candidate from its attribute-line string representation.
///
/// The grammar is positional-then-keyed: six fixed tokens followed by
/// key/value pairs. Engines append vendor extension pairs; unknown keys
/// are skipped and a dangling key without a value ends the scan.
pub fn unmarshal_candidate(raw: &str) -> Result<Candidate> {
    let split: Vec<&str> = raw.split_whitespace().collect();

    let foundation = match split.first().and_then(|t| t.strip_prefix("candidate:")) {
        Some(f) => f.to_owned(),
        None => return Err(Error::ErrNotACandidate),
    };

    if split.len() < 6 {
        return Err(Error::ErrAttributeTooShortIceCandidate);
    }

    // Component
    let component = split[1].to_owned();

    // Transport
    let protocol = TransportProtocol::from(split[2]);

    // Priority
    let priority = Priority::from(split[3]);

    // Address
    let address = split[4].to_owned();

    // Port
    let port: u16 = split[5].parse().map_err(|_| Error::ErrParsePort)?;

    let mut typ = None;
    let mut related_address = None;
    let mut related_port = None;

    let mut i = 6;
    while i + 1 < split.len() {
        let value = split[i + 1];
        match split[i] {
            "typ" => typ = Some(value),
            "raddr" => related_address = Some(value.to_owned()),
            "rport" => {
                related_port =
                    Some(value.parse::<u16>().map_err(|_| Error::ErrParseRelatedAddr)?)
            }
            // tcptype, generation, ufrag, network-id, ...
            _ => {}
        }
        i += 2;
    }

    let typ = match typ {
        Some(t) => CandidateType::from(t),
        None => return Err(Error::ErrMissingType),
    };
    if typ == CandidateType::Unspecified {
        return Err(Error::ErrUnknownCandidateType);
    }

    Ok(Candidate {
        foundation,
        component,
        protocol,
        priority,
        address,
        port,
        typ,
        related_address,
        related_port,
        raw: raw.to_owned(),
    })
}
