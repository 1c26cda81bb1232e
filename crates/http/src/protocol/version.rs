use crate::protocol::ParseError;
use std::fmt;

/// An HTTP protocol version, parsed from `"HTTP/<major>.<minor>"`.
///
/// Both components are single digits on the wire. The value is immutable
/// once parsed and displays back in the exact wire form, so parsing and
/// formatting round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpVersion {
    major: u8,
    minor: u8,
}

impl HttpVersion {
    pub const HTTP_1_1: HttpVersion = HttpVersion { major: 1, minor: 1 };

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub const fn major(&self) -> u8 {
        self.major
    }

    pub const fn minor(&self) -> u8 {
        self.minor
    }
}

impl TryFrom<&str> for HttpVersion {
    type Error = ParseError;

    fn try_from(str: &str) -> Result<Self, Self::Error> {
        let digits = str.strip_prefix("HTTP/").ok_or_else(|| ParseError::invalid_version(str))?;
        match digits.as_bytes() {
            [major @ b'0'..=b'9', b'.', minor @ b'0'..=b'9'] => Ok(Self::new(major - b'0', minor - b'0')),
            _ => Err(ParseError::invalid_version(str)),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}
