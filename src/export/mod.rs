use serde::Serialize;

use crate::candidate::candidate_subtype::CandidateSubtype;
use crate::candidate::{Candidate, Priority, TransportProtocol};
use crate::error::{Error, Result};

/// One candidate flattened for the copy-to-clipboard collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub subtype: CandidateSubtype,
    pub address: String,
    pub port: u16,
    pub protocol: TransportProtocol,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_port: Option<u16>,
}

impl From<&Candidate> for CandidateRecord {
    fn from(c: &Candidate) -> Self {
        CandidateRecord {
            subtype: c.subtype(),
            address: c.address.clone(),
            port: c.port,
            protocol: c.protocol.clone(),
            priority: c.priority.clone(),
            related_address: c.related_address.clone(),
            related_port: c.related_port,
        }
    }
}

/// Newline-delimited summary of the accepted candidates, one per line:
/// `typ <subtype> <address>:<port> <PROTOCOL> prio <priority>` plus the
/// related address/port when present.
pub fn summary(candidates: &[Candidate]) -> String {
    let mut lines = Vec::with_capacity(candidates.len());
    for c in candidates {
        let mut line = format!(
            "typ {} {}:{} {} prio {}",
            c.subtype(),
            c.address,
            c.port,
            c.protocol,
            c.priority
        );
        if let Some(raddr) = &c.related_address {
            line.push_str(&format!(" raddr {raddr}"));
        }
        if let Some(rport) = c.related_port {
            line.push_str(&format!(" rport {rport}"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn to_records(candidates: &[Candidate]) -> Vec<CandidateRecord> {
    candidates.iter().map(CandidateRecord::from).collect()
}

/// Structured-record export as pretty-printed JSON.
pub fn to_json(candidates: &[Candidate]) -> Result<String> {
    serde_json::to_string_pretty(&to_records(candidates)).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::candidate::unmarshal_candidate;

    fn probe_results() -> Vec<Candidate> {
        vec![
            unmarshal_candidate(
                "candidate:842163049 1 udp 1677729535 192.168.0.2 60769 typ host",
            )
            .unwrap(),
            unmarshal_candidate(
                "candidate:1 1 udp 100 8f3b2c1a-4f2e-4d28-a0c5-7de193f80d12.local 54321 typ host",
            )
            .unwrap(),
            unmarshal_candidate(
                "candidate:2 1 udp 99 203.0.113.5 60000 typ srflx raddr 192.168.0.2 rport 60769",
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_summary_lines() {
        let expected = "typ host 192.168.0.2:60769 UDP prio 1677729535\n\
                        typ mdns 8f3b2c1a-4f2e-4d28-a0c5-7de193f80d12.local:54321 UDP prio 100\n\
                        typ srflx 203.0.113.5:60000 UDP prio 99 raddr 192.168.0.2 rport 60769";

        assert_eq!(summary(&probe_results()), expected);
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(summary(&[]), "");
    }

    #[test]
    fn test_records_field_names() {
        let json = to_json(&probe_results()).unwrap();

        assert!(json.contains(r#""subtype": "mdns""#));
        assert!(json.contains(r#""protocol": "UDP""#));
        assert!(json.contains(r#""relatedAddress": "192.168.0.2""#));
        assert!(json.contains(r#""relatedPort": 60769"#));
        // Host candidates carry no related address and the field is omitted.
        assert_eq!(json.matches("relatedAddress").count(), 1);
    }

    #[test]
    fn test_record_priority_forms() {
        let numeric = CandidateRecord::from(
            &unmarshal_candidate("candidate:1 1 udp 100 192.168.0.2 60769 typ host").unwrap(),
        );
        assert_eq!(serde_json::to_value(&numeric.priority).unwrap(), 100);

        let textual = CandidateRecord::from(
            &unmarshal_candidate("candidate:1 1 udp 99999999999 192.168.0.2 60769 typ host")
                .unwrap(),
        );
        assert_eq!(
            serde_json::to_value(&textual.priority).unwrap(),
            "99999999999"
        );
    }
}
