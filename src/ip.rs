//! Editor address anonymization.
//!
//! Only the two low-order segments of an address are kept for display:
//!
//! - IPv4 `192.168.1.25` becomes `xxx.xxx.1.25`
//! - IPv6 `2001:db8::1` is expanded to all eight hextets first, then becomes
//!   `xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:0:1`
//!
//! Anything that does not parse as an address yields [`UNKNOWN_IP`].

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Placeholder shown for a missing or malformed address.
pub const UNKNOWN_IP: &str = "Unknown IP";

/// Masks all but the last two segments of `raw`. Never fails.
pub fn anonymize(raw: &str) -> String {
    match raw.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => anonymize_v4(addr),
        Ok(IpAddr::V6(addr)) => anonymize_v6(addr),
        Err(_) => UNKNOWN_IP.to_string(),
    }
}

fn anonymize_v4(addr: Ipv4Addr) -> String {
    let [_, _, third, fourth] = addr.octets();
    format!("xxx.xxx.{}.{}", third, fourth)
}

fn anonymize_v6(addr: Ipv6Addr) -> String {
    // segments() is always the full eight hextets, whatever the input notation
    let segments = addr.segments();
    let mut parts: Vec<String> = vec!["xxxx".to_string(); 6];
    parts.extend(segments[6..].iter().map(|s| format!("{:x}", s)));
    parts.join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4() {
        assert_eq!(anonymize("192.168.1.25"), "xxx.xxx.1.25");
        assert_eq!(anonymize("10.0.45.198"), "xxx.xxx.45.198");
        assert_eq!(anonymize("127.0.0.1"), "xxx.xxx.0.1");
    }

    #[test]
    fn test_ipv6_compressed() {
        assert_eq!(anonymize("2001:db8::1"), "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:0:1");
        assert_eq!(
            anonymize("2001:db8::abcd:1234"),
            "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:abcd:1234"
        );
        assert_eq!(anonymize("::1"), "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:0:1");
    }

    #[test]
    fn test_ipv6_expansion_is_canonical() {
        assert_eq!(anonymize("2001:db8::1"), anonymize("2001:db8:0:0:0:0:0:1"));
        assert_eq!(
            anonymize("2001:0DB8:0000:0000:0000:FF00:0042:8329"),
            "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:42:8329"
        );
    }

    #[test]
    fn test_ipv4_mapped_ipv6() {
        assert_eq!(
            anonymize("::ffff:192.168.1.25"),
            "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:c0a8:119"
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(anonymize("not-an-ip"), UNKNOWN_IP);
        assert_eq!(anonymize(""), UNKNOWN_IP);
        assert_eq!(anonymize("256.1.1.1"), UNKNOWN_IP);
        assert_eq!(anonymize("1.2.3"), UNKNOWN_IP);
        assert_eq!(anonymize("2001:db8:::1"), UNKNOWN_IP);
        assert_eq!(anonymize(" 10.0.0.1"), UNKNOWN_IP);
        assert_eq!(anonymize("Unknown"), UNKNOWN_IP);
    }
}
