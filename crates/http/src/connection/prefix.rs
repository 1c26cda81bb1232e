use crate::protocol::ParseError;
use std::fmt;
use std::net::Ipv4Addr;

const SECURE_PROTOCOLS: [&str; 3] = ["https", "ssl", "tls"];

/// An address/port/protocol triple a listener binds to.
///
/// Parsed from `[protocol://]address[:port]`. The address is restricted to
/// an IPv4 dotted quad or the literal `localhost`; the port defaults to 80,
/// or 443 for a secure protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerPrefix {
    address: String,
    port: u16,
    protocol: String,
}

impl ListenerPrefix {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let (protocol, rest) = match raw.split_once("://") {
            Some((protocol, rest)) => (protocol, rest),
            None => ("http", raw),
        };
        if protocol.is_empty() || !protocol.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ParseError::invalid_prefix(format!("bad protocol in '{raw}'")));
        }
        let protocol = protocol.to_ascii_lowercase();

        let (address, port) = match rest.split_once(':') {
            Some((address, port)) => {
                let port: u16 =
                    port.parse().map_err(|_| ParseError::invalid_prefix(format!("bad port in '{raw}'")))?;
                (address, port)
            }
            None => (rest, default_port(&protocol)),
        };

        if address != "localhost" && address.parse::<Ipv4Addr>().is_err() {
            return Err(ParseError::invalid_prefix(format!("address must be an IPv4 dotted quad, got '{address}'")));
        }

        Ok(Self { address: address.to_string(), port, protocol })
    }

    /// The default insecure prefix, `http://localhost:8080`.
    pub fn default_http() -> Self {
        Self { address: "localhost".to_string(), port: 8080, protocol: "http".to_string() }
    }

    /// The default secure prefix, `https://localhost:8443`.
    pub fn default_https() -> Self {
        Self { address: "localhost".to_string(), port: 8443, protocol: "https".to_string() }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn secure(&self) -> bool {
        SECURE_PROTOCOLS.contains(&self.protocol.as_str())
    }

    /// The concrete address to bind; `localhost` maps to the loopback.
    pub fn bind_address(&self) -> (Ipv4Addr, u16) {
        let ip = if self.address == "localhost" {
            Ipv4Addr::LOCALHOST
        } else {
            // validated during parse
            self.address.parse().unwrap_or(Ipv4Addr::LOCALHOST)
        };
        (ip, self.port)
    }

    /// `address:port`, as used in redirect targets.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Display for ListenerPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.address, self.port)
    }
}

fn default_port(protocol: &str) -> u16 {
    if SECURE_PROTOCOLS.contains(&protocol) { 443 } else { 80 }
}
