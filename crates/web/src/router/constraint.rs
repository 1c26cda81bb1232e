//! Typed validators for variable route segments.
//!
//! A constraint both checks a segment's string value and converts it to a
//! typed [`RouteValue`]. Constraints live in a [`ConstraintRegistry`] keyed
//! by identifier; the registry ships the built-in set and stays open for
//! application-defined validators. A constraint miss is a normal negative
//! result, never an error.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A typed value produced by a successful constraint match.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteValue {
    Str(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(f64),
    Guid(Uuid),
    DateTime(NaiveDateTime),
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Guid(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{v}"),
        }
    }
}

pub trait RouteConstraint: Send + Sync {
    fn identifier(&self) -> &'static str;

    fn matches(&self, value: &str) -> Option<RouteValue>;
}

/// Accepts any run of ASCII letters, including the empty string.
#[derive(Debug)]
pub struct AlphaRouteConstraint;

impl RouteConstraint for AlphaRouteConstraint {
    fn identifier(&self) -> &'static str {
        "alpha"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        value.bytes().all(|b| b.is_ascii_alphabetic()).then(|| RouteValue::Str(value.to_string()))
    }
}

/// Case-insensitive `true`/`false`.
#[derive(Debug)]
pub struct BooleanRouteConstraint;

impl RouteConstraint for BooleanRouteConstraint {
    fn identifier(&self) -> &'static str {
        "bool"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        if value.eq_ignore_ascii_case("true") {
            Some(RouteValue::Bool(true))
        } else if value.eq_ignore_ascii_case("false") {
            Some(RouteValue::Bool(false))
        } else {
            None
        }
    }
}

/// 32-bit signed decimal integer; no decimal point, overflow rejects.
#[derive(Debug)]
pub struct IntegerRouteConstraint;

impl RouteConstraint for IntegerRouteConstraint {
    fn identifier(&self) -> &'static str {
        "int"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        is_plain_integer(value).then(|| value.parse().ok().map(RouteValue::Int)).flatten()
    }
}

/// 64-bit signed decimal integer.
#[derive(Debug)]
pub struct LongRouteConstraint;

impl RouteConstraint for LongRouteConstraint {
    fn identifier(&self) -> &'static str {
        "long"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        is_plain_integer(value).then(|| value.parse().ok().map(RouteValue::Long)).flatten()
    }
}

#[derive(Debug)]
pub struct FloatRouteConstraint;

impl RouteConstraint for FloatRouteConstraint {
    fn identifier(&self) -> &'static str {
        "float"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        is_plain_decimal(value).then(|| value.parse().ok().map(RouteValue::Float)).flatten()
    }
}

#[derive(Debug)]
pub struct DoubleRouteConstraint;

impl RouteConstraint for DoubleRouteConstraint {
    fn identifier(&self) -> &'static str {
        "double"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        is_plain_decimal(value).then(|| value.parse().ok().map(RouteValue::Double)).flatten()
    }
}

#[derive(Debug)]
pub struct DecimalRouteConstraint;

impl RouteConstraint for DecimalRouteConstraint {
    fn identifier(&self) -> &'static str {
        "decimal"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        is_plain_decimal(value).then(|| value.parse().ok().map(RouteValue::Decimal)).flatten()
    }
}

/// 32 hex digits, bare or in canonical 8-4-4-4-12 grouping. Braced and
/// parenthesized forms are rejected.
#[derive(Debug)]
pub struct GuidRouteConstraint;

impl RouteConstraint for GuidRouteConstraint {
    fn identifier(&self) -> &'static str {
        "guid"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        if !value.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-') {
            return None;
        }
        Uuid::parse_str(value).ok().map(RouteValue::Guid)
    }
}

/// Common unambiguous date/time layouts; the empty string never matches.
#[derive(Debug)]
pub struct DateTimeRouteConstraint;

const DATE_TIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

impl RouteConstraint for DateTimeRouteConstraint {
    fn identifier(&self) -> &'static str {
        "datetime"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        if value.is_empty() {
            return None;
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
                return Some(RouteValue::DateTime(parsed));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
                return Some(RouteValue::DateTime(parsed.and_hms_opt(0, 0, 0)?));
            }
        }
        None
    }
}

/// Always matches, returns the input unchanged.
#[derive(Debug)]
pub struct StringRouteConstraint;

impl RouteConstraint for StringRouteConstraint {
    fn identifier(&self) -> &'static str {
        "string"
    }

    fn matches(&self, value: &str) -> Option<RouteValue> {
        Some(RouteValue::Str(value.to_string()))
    }
}

fn is_plain_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Sign, digits, at most one decimal point. No thousands separators,
/// currency symbols or exponents.
fn is_plain_decimal(value: &str) -> bool {
    let rest = value.strip_prefix(['+', '-']).unwrap_or(value);
    let mut digit_seen = false;
    let mut point_seen = false;
    for byte in rest.bytes() {
        match byte {
            b'0'..=b'9' => digit_seen = true,
            b'.' if !point_seen => point_seen = true,
            _ => return false,
        }
    }
    digit_seen
}

/// Identifier → validator lookup, seeded with the built-in set.
#[derive(Clone)]
pub struct ConstraintRegistry {
    validators: HashMap<&'static str, Arc<dyn RouteConstraint>>,
}

impl fmt::Debug for ConstraintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintRegistry").field("identifiers", &self.validators.keys().collect::<Vec<_>>()).finish()
    }
}

impl ConstraintRegistry {
    pub fn with_defaults() -> Self {
        let mut registry = Self { validators: HashMap::new() };
        registry.register(Arc::new(AlphaRouteConstraint));
        registry.register(Arc::new(BooleanRouteConstraint));
        registry.register(Arc::new(IntegerRouteConstraint));
        registry.register(Arc::new(LongRouteConstraint));
        registry.register(Arc::new(FloatRouteConstraint));
        registry.register(Arc::new(DoubleRouteConstraint));
        registry.register(Arc::new(DecimalRouteConstraint));
        registry.register(Arc::new(GuidRouteConstraint));
        registry.register(Arc::new(DateTimeRouteConstraint));
        registry.register(Arc::new(StringRouteConstraint));
        registry
    }

    pub fn register(&mut self, constraint: Arc<dyn RouteConstraint>) {
        self.validators.insert(constraint.identifier(), constraint);
    }

    pub fn get(&self, identifier: &str) -> Option<&dyn RouteConstraint> {
        self.validators.get(identifier).map(Arc::as_ref)
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha() {
        assert_eq!(AlphaRouteConstraint.matches("Index"), Some(RouteValue::Str("Index".to_string())));
        assert_eq!(AlphaRouteConstraint.matches(""), Some(RouteValue::Str(String::new())));
        assert_eq!(AlphaRouteConstraint.matches("abc1"), None);
        assert_eq!(AlphaRouteConstraint.matches("a-b"), None);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(BooleanRouteConstraint.matches("true"), Some(RouteValue::Bool(true)));
        assert_eq!(BooleanRouteConstraint.matches("FALSE"), Some(RouteValue::Bool(false)));
        assert_eq!(BooleanRouteConstraint.matches("1"), None);
        assert_eq!(BooleanRouteConstraint.matches(""), None);
    }

    #[test]
    fn test_boolean_identifier_is_not_int() {
        assert_eq!(BooleanRouteConstraint.identifier(), "bool");
        assert_eq!(IntegerRouteConstraint.identifier(), "int");
    }

    #[test]
    fn test_integer() {
        assert_eq!(IntegerRouteConstraint.matches("-1"), Some(RouteValue::Int(-1)));
        assert_eq!(IntegerRouteConstraint.matches("+42"), Some(RouteValue::Int(42)));
        assert_eq!(IntegerRouteConstraint.matches("1."), None);
        assert_eq!(IntegerRouteConstraint.matches("1.5"), None);
        // i64::MAX overflows the 32-bit range
        assert_eq!(IntegerRouteConstraint.matches(&i64::MAX.to_string()), None);
    }

    #[test]
    fn test_long() {
        assert_eq!(LongRouteConstraint.matches(&i64::MAX.to_string()), Some(RouteValue::Long(i64::MAX)));
        assert_eq!(LongRouteConstraint.matches("abc"), None);
    }

    #[test]
    fn test_decimal_family() {
        assert_eq!(DoubleRouteConstraint.matches("-1.5"), Some(RouteValue::Double(-1.5)));
        assert_eq!(FloatRouteConstraint.matches("0.25"), Some(RouteValue::Float(0.25)));
        assert_eq!(DecimalRouteConstraint.matches("100"), Some(RouteValue::Decimal(100.0)));
        assert_eq!(DoubleRouteConstraint.matches("1,000.5"), None);
        assert_eq!(DoubleRouteConstraint.matches("$5"), None);
        assert_eq!(DoubleRouteConstraint.matches("1e5"), None);
        assert_eq!(DoubleRouteConstraint.matches("1.2.3"), None);
        assert_eq!(DoubleRouteConstraint.matches("."), None);
    }

    #[test]
    fn test_guid() {
        let canonical = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let bare = "67e5504410b1426f9247bb680e5fe0c8";
        assert!(GuidRouteConstraint.matches(canonical).is_some());
        assert!(GuidRouteConstraint.matches(bare).is_some());
        assert!(GuidRouteConstraint.matches("{67e55044-10b1-426f-9247-bb680e5fe0c8}").is_none());
        assert!(GuidRouteConstraint.matches("(67e55044-10b1-426f-9247-bb680e5fe0c8)").is_none());
        assert!(GuidRouteConstraint.matches("67e55044-10b1").is_none());
    }

    #[test]
    fn test_datetime() {
        assert!(DateTimeRouteConstraint.matches("2024-06-01 13:30:00").is_some());
        assert!(DateTimeRouteConstraint.matches("2024-06-01T13:30:00").is_some());
        assert!(DateTimeRouteConstraint.matches("06/01/2024").is_some());
        assert!(DateTimeRouteConstraint.matches("").is_none());
        assert!(DateTimeRouteConstraint.matches("not a date").is_none());
    }

    #[test]
    fn test_string_always_matches() {
        assert_eq!(StringRouteConstraint.matches("anything at all"), Some(RouteValue::Str("anything at all".to_string())));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ConstraintRegistry::with_defaults();
        assert!(registry.get("int").is_some());
        assert!(registry.get("bool").is_some());
        assert!(registry.get("guid").is_some());
        assert!(registry.get("nope").is_none());
    }
}
