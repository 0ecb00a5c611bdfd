use super::*;

#[test]
fn test_mdns_hostname_detection() {
    let tests = vec![
        ("8f3b2c1a-4f2e-4d28-a0c5-7de193f80d12.local", true),
        ("connectivity-check.local", true),
        ("UPPER-CASE.LOCAL", true),
        ("trailing-dot.local.", true),
        ("192.168.0.2", false),
        ("2001:db8::1", false),
        ("local", false),
        (".local", false),
        ("example.locale", false),
        ("", false),
    ];

    for (address, expected) in tests {
        assert_eq!(
            is_mdns_hostname(address),
            expected,
            "address: {address}"
        );
    }
}
