#[cfg(test)]
mod mdns_test;

use regex::Regex;

lazy_static! {
    // Obscured host candidates carry an opaque name ending in ".local",
    // optionally with a trailing dot.
    static ref MDNS_HOSTNAME: Regex = Regex::new(r"(?i)^.+\.local\.?$").unwrap();
}

/// Reports whether an address is an mDNS name rather than a literal IP.
///
/// Browsers replace the interface address of host candidates with such a
/// name to hide the real local IP. The check runs on the candidate's
/// literal address text; engines never obscure the related address.
pub fn is_mdns_hostname(address: &str) -> bool {
    MDNS_HOSTNAME.is_match(address)
}
