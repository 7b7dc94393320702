//! Endpoint address handling.

use crate::error::TLSValidationError;

/// Port used when an endpoint omits one.
pub const DEFAULT_PORT: u16 = 443;

/// Splits `host`, `host:port`, `[v6]` or `[v6]:port` into its parts.
///
/// IPv6 literals must be bracketed; an unbracketed address with more than one
/// colon is rejected rather than guessing where the port starts.
pub fn split_host_port(addr: &str) -> Result<(String, u16), TLSValidationError> {
    let addr = addr.trim();

    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| invalid(addr, "bracketed host in"))?;
        let port = match tail {
            "" => DEFAULT_PORT,
            _ => match tail.strip_prefix(':') {
                Some(port) => parse_port(addr, port)?,
                None => return Err(invalid(addr, "address")),
            },
        };
        return host_or_err(addr, host).map(|h| (h, port));
    }

    if addr.matches(':').count() > 1 {
        return Err(invalid(addr, "too many colons in"));
    }

    match addr.rsplit_once(':') {
        Some((host, port)) => {
            let port = parse_port(addr, port)?;
            host_or_err(addr, host).map(|h| (h, port))
        }
        None => host_or_err(addr, addr).map(|h| (h, DEFAULT_PORT)),
    }
}

fn parse_port(addr: &str, port: &str) -> Result<u16, TLSValidationError> {
    port.parse::<u16>().map_err(|_| invalid(addr, "port in"))
}

fn host_or_err(addr: &str, host: &str) -> Result<String, TLSValidationError> {
    if host.is_empty() {
        Err(invalid(addr, "empty host in"))
    } else {
        Ok(host.to_string())
    }
}

fn invalid(addr: &str, reason: &str) -> TLSValidationError {
    TLSValidationError::InvalidInput {
        field: addr.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_only_uses_default_port() {
        assert_eq!(
            split_host_port("example.com").unwrap(),
            ("example.com".to_string(), 443)
        );
    }

    #[test]
    fn test_host_and_port() {
        assert_eq!(
            split_host_port("example.com:8443").unwrap(),
            ("example.com".to_string(), 8443)
        );
    }

    #[test]
    fn test_ipv6_forms() {
        assert_eq!(split_host_port("[::1]:8443").unwrap(), ("::1".to_string(), 8443));
        assert_eq!(split_host_port("[::1]").unwrap(), ("::1".to_string(), 443));
    }

    #[test]
    fn test_unbracketed_ipv6_is_rejected() {
        for bad in &["::1", "::1:8443", "2001:db8::1:443"] {
            match split_host_port(bad) {
                Err(TLSValidationError::InvalidInput { reason, .. }) => {
                    assert_eq!(reason, "too many colons in")
                }
                other => panic!("{} should be rejected, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_malformed_endpoints() {
        for bad in &[
            "example.com:https",
            ":443",
            "",
            "[::1",
            "[::1]x",
            "host:70000",
            "::1:8443",
        ] {
            let err = split_host_port(bad).unwrap_err();
            assert!(
                matches!(err, TLSValidationError::InvalidInput { .. }),
                "{} should be rejected",
                bad
            );
        }
    }
}
