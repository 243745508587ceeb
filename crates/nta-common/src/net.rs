//! RFC 1918 private-address discrimination.

use std::net::Ipv4Addr;

/// True iff `addr` parses as an IPv4 address inside one of the three
/// private ranges (`10.0.0.0/8`, `172.16.0.0/12`, `192.168.0.0/16`).
/// Anything else - including IPv6 and unparseable text - is "external".
pub fn is_rfc1918(addr: &str) -> bool {
    match addr.parse::<Ipv4Addr>() {
        Ok(ip) => {
            let o = ip.octets();
            o[0] == 10 || (o[0] == 172 && (16..=31).contains(&o[1])) || (o[0] == 192 && o[1] == 168)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_a_private() {
        assert!(is_rfc1918("10.0.0.1"));
        assert!(is_rfc1918("10.255.255.255"));
    }

    #[test]
    fn class_b_private_range() {
        assert!(is_rfc1918("172.16.0.1"));
        assert!(is_rfc1918("172.31.255.255"));
        assert!(!is_rfc1918("172.15.0.1"));
        assert!(!is_rfc1918("172.32.0.1"));
    }

    #[test]
    fn class_c_private() {
        assert!(is_rfc1918("192.168.0.1"));
        assert!(!is_rfc1918("192.167.0.1"));
    }

    #[test]
    fn public_and_malformed_are_external() {
        assert!(!is_rfc1918("8.8.8.8"));
        assert!(!is_rfc1918("not-an-ip"));
        assert!(!is_rfc1918("::1"));
    }
}
