use crate::protocol::ParseError;
use std::fmt;
use std::ops::BitOr;

/// A single HTTP request verb.
///
/// Wire parsing is case-sensitive: `"get"` is an unknown verb, only the
/// canonical upper-case names match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HttpMethod {
    Get = 1 << 0,
    Head = 1 << 1,
    Post = 1 << 2,
    Put = 1 << 3,
    Delete = 1 << 4,
    Connect = 1 << 5,
    Options = 1 << 6,
    Trace = 1 << 7,
    Patch = 1 << 8,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }

    const fn bit(self) -> u16 {
        self as u16
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = ParseError;

    fn try_from(str: &str) -> Result<Self, Self::Error> {
        match str {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "CONNECT" => Ok(Self::Connect),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "PATCH" => Ok(Self::Patch),
            _ => Err(ParseError::verb_not_implemented(str)),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A union of accepted [`HttpMethod`] flags.
///
/// Routes carry a `MethodSet`; an incoming request matches when its verb is
/// contained in the set. Sets compose with `|`:
///
/// ```
/// use paracord_http::protocol::{HttpMethod, MethodSet};
///
/// let set = HttpMethod::Get | HttpMethod::Post;
/// assert!(set.contains(HttpMethod::Post));
/// assert!(!set.contains(HttpMethod::Delete));
/// assert!(MethodSet::ALL.contains(HttpMethod::Trace));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSet(u16);

impl MethodSet {
    pub const NONE: MethodSet = MethodSet(0);
    pub const ALL: MethodSet = MethodSet(0x1ff);

    pub const fn contains(self, method: HttpMethod) -> bool {
        self.0 & method.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<HttpMethod> for MethodSet {
    fn from(method: HttpMethod) -> Self {
        MethodSet(method.bit())
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        MethodSet(self.0 | rhs.0)
    }
}

impl BitOr<HttpMethod> for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: HttpMethod) -> Self::Output {
        MethodSet(self.0 | rhs.bit())
    }
}

impl BitOr for HttpMethod {
    type Output = MethodSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        MethodSet(self.bit() | rhs.bit())
    }
}

impl BitOr<MethodSet> for HttpMethod {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodSet) -> Self::Output {
        rhs | self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from() {
        assert_eq!(HttpMethod::try_from("GET").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::try_from("PATCH").unwrap(), HttpMethod::Patch);
    }

    #[test]
    fn test_method_from_is_case_sensitive() {
        assert!(HttpMethod::try_from("get").is_err());
        assert!(HttpMethod::try_from("Get").is_err());
        assert!(HttpMethod::try_from("").is_err());
        assert!(HttpMethod::try_from("BREW").is_err());
    }

    #[test]
    fn test_method_set_containment() {
        let set = HttpMethod::Get | HttpMethod::Head;
        assert!(set.contains(HttpMethod::Get));
        assert!(set.contains(HttpMethod::Head));
        assert!(!set.contains(HttpMethod::Post));

        let set = set | HttpMethod::Post;
        assert!(set.contains(HttpMethod::Post));
    }

    #[test]
    fn test_method_set_all_and_none() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Connect,
            HttpMethod::Options,
            HttpMethod::Trace,
            HttpMethod::Patch,
        ] {
            assert!(MethodSet::ALL.contains(method));
            assert!(!MethodSet::NONE.contains(method));
        }
    }
}
