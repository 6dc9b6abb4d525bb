use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const UNKNOWN_SERVICE: &str = "Unknown Service";

static COMMON_PORTS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (20, "FTP (Data Transfer)"),
        (21, "FTP (Control)"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (8080, "HTTP Proxy"),
    ])
});

#[inline]
pub fn lookup(port: u16) -> Option<&'static str> {
    COMMON_PORTS.get(&port).copied()
}

/// Service label of `port`, or [`UNKNOWN_SERVICE`] if it isn't well known.
#[inline]
pub fn service(port: u16) -> &'static str {
    lookup(port).unwrap_or(UNKNOWN_SERVICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ports_are_labelled() {
        assert_eq!(service(22), "SSH");
        assert_eq!(service(443), "HTTPS");
        assert_eq!(service(8080), "HTTP Proxy");
        assert_eq!(service(20), "FTP (Data Transfer)");
    }

    #[test]
    fn unmapped_ports_fall_back() {
        assert_eq!(service(0), UNKNOWN_SERVICE);
        assert_eq!(service(8081), UNKNOWN_SERVICE);
        assert_eq!(lookup(65535), None);
    }

    #[test]
    fn table_has_thirteen_entries() {
        assert_eq!((0..=u16::MAX).filter_map(lookup).count(), 13);
    }
}
