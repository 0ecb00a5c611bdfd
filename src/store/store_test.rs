use super::*;
use crate::candidate::unmarshal_candidate;
use crate::error::Result;

fn must_parse(raw: &str) -> Candidate {
    unmarshal_candidate(raw).unwrap()
}

#[test]
fn test_try_add_rejects_duplicate_key() -> Result<()> {
    let mut store = CandidateStore::new();

    // Same (type, address, port, protocol) key, different foundation and
    // priority: still a duplicate.
    let first = must_parse("candidate:842163049 1 udp 1677729535 192.168.0.2 60769 typ host");
    let second = must_parse("candidate:111111111 1 udp 999 192.168.0.2 60769 typ host");

    assert!(store.try_add(first));
    assert_eq!(store.len(), 1);
    assert!(!store.try_add(second));
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].foundation, "842163049");

    Ok(())
}

#[test]
fn test_try_add_keeps_arrival_order() {
    let mut store = CandidateStore::new();

    let raws = vec![
        "candidate:3 1 udp 100 10.0.0.3 3000 typ host",
        "candidate:1 1 udp 300 10.0.0.1 1000 typ host",
        "candidate:2 1 udp 200 203.0.113.5 2000 typ srflx raddr 10.0.0.1 rport 1000",
    ];

    for raw in &raws {
        assert!(store.try_add(must_parse(raw)));
    }

    let stored: Vec<&str> = store.list().iter().map(|c| c.raw.as_str()).collect();
    assert_eq!(stored, raws);
}

#[test]
fn test_dedup_key_includes_protocol() {
    let mut store = CandidateStore::new();

    assert!(store.try_add(must_parse(
        "candidate:1 1 udp 100 192.168.0.2 60769 typ host"
    )));
    assert!(store.try_add(must_parse(
        "candidate:1 1 tcp 100 192.168.0.2 60769 typ host"
    )));

    assert_eq!(store.len(), 2);
}

#[test]
fn test_dedup_key_includes_type() {
    let mut store = CandidateStore::new();

    assert!(store.try_add(must_parse(
        "candidate:1 1 udp 100 203.0.113.5 60000 typ host"
    )));
    assert!(store.try_add(must_parse(
        "candidate:1 1 udp 100 203.0.113.5 60000 typ srflx"
    )));

    assert_eq!(store.len(), 2);
}

#[test]
fn test_clear() {
    let mut store = CandidateStore::new();

    assert!(store.try_add(must_parse(
        "candidate:1 1 udp 100 192.168.0.2 60769 typ host"
    )));
    assert!(!store.is_empty());

    store.clear();

    assert!(store.is_empty());
    // A cleared store accepts the same candidate again.
    assert!(store.try_add(must_parse(
        "candidate:1 1 udp 100 192.168.0.2 60769 typ host"
    )));
}
