#[cfg(test)]
mod store_test;

use std::collections::HashSet;

use crate::candidate::{Candidate, CandidateType, TransportProtocol};

/// Key under which two candidates count as the same observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    typ: CandidateType,
    address: String,
    port: u16,
    protocol: TransportProtocol,
}

impl From<&Candidate> for DedupKey {
    fn from(c: &Candidate) -> Self {
        DedupKey {
            typ: c.typ,
            address: c.address.clone(),
            port: c.port,
            protocol: c.protocol.clone(),
        }
    }
}

/// Ordered, deduplicated collection of the candidates accepted during one
/// gathering session.
#[derive(Default)]
pub struct CandidateStore {
    seen: HashSet<DedupKey>,
    candidates: Vec<Candidate>,
}

impl CandidateStore {
    pub fn new() -> Self {
        CandidateStore::default()
    }

    /// Appends the candidate unless one with the same
    /// (type, address, port, protocol) key was accepted before.
    ///
    /// Engines re-announce candidates across interfaces and policies, so a
    /// rejected duplicate is normal behavior, not an error.
    pub fn try_add(&mut self, candidate: Candidate) -> bool {
        if !self.seen.insert(DedupKey::from(&candidate)) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    /// All accepted candidates, in arrival order.
    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Drops every accepted candidate. The owning session only calls this
    /// while it is not actively gathering.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.candidates.clear();
    }
}
