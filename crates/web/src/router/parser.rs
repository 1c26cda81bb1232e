//! Parser turning a route-definition string into ordered segments.
//!
//! The full route string is split on `/`; each slice must contain exactly
//! one segment definition:
//!
//! ```text
//! segment := NAME                 -- constant
//!          | '{' NAME '}'         -- variable
//!          | '{' NAME '=' NAME '}' -- variable with default
//! ```
//!
//! Each `parse` call owns its own tokenizer, so parsers are freely shareable
//! and re-entrant. Errors carry the absolute byte offset of the offending
//! token in the original route string.

use crate::router::ControllerRouteSegment;
use crate::router::tokenizer::{LexError, RouteToken, RouteTokenType, RouteTokenizer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
}

impl RouteParseError {
    fn unexpected(token: &RouteToken, base: usize) -> Self {
        let found = if token.token_type == RouteTokenType::Eof {
            "end of segment".to_string()
        } else {
            token.value.clone()
        };
        Self::UnexpectedToken { found, offset: base + token.start }
    }
}

#[derive(Debug, Default)]
pub struct RouteParser;

impl RouteParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a whole route string into its ordered segment list. An empty
    /// string is zero segments, not an error.
    pub fn parse(&self, route: &str) -> Result<Vec<ControllerRouteSegment>, RouteParseError> {
        if route.is_empty() {
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        let mut base = 0;
        for slice in route.split('/') {
            segments.push(self.parse_segment(slice, base)?);
            base += slice.len() + 1;
        }
        Ok(segments)
    }

    /// Parses exactly one `/`-free segment definition; trailing tokens after
    /// the definition are an error.
    fn parse_segment(&self, slice: &str, base: usize) -> Result<ControllerRouteSegment, RouteParseError> {
        let mut tokenizer = RouteTokenizer::new();
        tokenizer.set_source(slice);

        let token = next_with_base(&mut tokenizer, base)?;
        let segment = match token.token_type {
            RouteTokenType::Name => ControllerRouteSegment::constant(token.value.clone()),
            RouteTokenType::BraceLeft => self.parse_variable(&mut tokenizer, base)?,
            _ => return Err(RouteParseError::unexpected(&token, base)),
        };

        let trailing = next_with_base(&mut tokenizer, base)?;
        if trailing.token_type != RouteTokenType::Eof {
            return Err(RouteParseError::unexpected(&trailing, base));
        }

        Ok(segment)
    }

    fn parse_variable(&self, tokenizer: &mut RouteTokenizer, base: usize) -> Result<ControllerRouteSegment, RouteParseError> {
        let name = next_with_base(tokenizer, base)?;
        if name.token_type != RouteTokenType::Name {
            return Err(RouteParseError::unexpected(&name, base));
        }
        // variable names are pure letters; defaults may contain digits
        if name.value.bytes().any(|b| b.is_ascii_digit()) {
            return Err(RouteParseError::unexpected(&name, base));
        }

        let token = next_with_base(tokenizer, base)?;
        match token.token_type {
            RouteTokenType::BraceRight => Ok(ControllerRouteSegment::variable(name.value.clone())),
            RouteTokenType::Equal => {
                let default = next_with_base(tokenizer, base)?;
                if default.token_type != RouteTokenType::Name {
                    return Err(RouteParseError::unexpected(&default, base));
                }
                let close = next_with_base(tokenizer, base)?;
                if close.token_type != RouteTokenType::BraceRight {
                    return Err(RouteParseError::unexpected(&close, base));
                }
                Ok(ControllerRouteSegment::variable_with_default(name.value.clone(), default.value.clone()))
            }
            _ => Err(RouteParseError::unexpected(&token, base)),
        }
    }
}

fn next_with_base(tokenizer: &mut RouteTokenizer, base: usize) -> Result<RouteToken, RouteParseError> {
    tokenizer.next_token().map_err(|e| LexError { byte: e.byte, offset: base + e.offset }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::SegmentKind;

    fn parse(route: &str) -> Result<Vec<ControllerRouteSegment>, RouteParseError> {
        RouteParser::new().parse(route)
    }

    #[test]
    fn test_empty_route_is_zero_segments() {
        assert_eq!(parse("").unwrap(), Vec::new());
    }

    #[test]
    fn test_constant_segments() {
        let segments = parse("api/users").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind(), SegmentKind::Constant);
        assert_eq!(segments[0].name(), "api");
        assert_eq!(segments[1].name(), "users");
    }

    #[test]
    fn test_variable_segment() {
        let segments = parse("{action}").unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind(), SegmentKind::Variable);
        assert_eq!(segments[0].name(), "action");
        assert_eq!(segments[0].default(), None);
    }

    #[test]
    fn test_variable_with_default() {
        let segments = parse("{controller=index}/{action}").unwrap();
        assert_eq!(segments[0].kind(), SegmentKind::Variable);
        assert_eq!(segments[0].name(), "controller");
        assert_eq!(segments[0].default(), Some("index"));
        assert_eq!(segments[1].name(), "action");
    }

    #[test]
    fn test_default_may_contain_digits() {
        let segments = parse("{page=1}").unwrap();
        assert_eq!(segments[0].default(), Some("1"));
    }

    #[test]
    fn test_variable_name_with_digits_is_rejected() {
        assert!(matches!(parse("{page2}"), Err(RouteParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_empty_braces_are_rejected() {
        assert!(matches!(parse("{}"), Err(RouteParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_name_followed_by_equal_outside_braces() {
        let error = parse("name=value").unwrap_err();
        assert_eq!(error, RouteParseError::UnexpectedToken { found: "=".to_string(), offset: 4 });
    }

    #[test]
    fn test_trailing_garbage_after_variable() {
        assert!(parse("{action}x").is_err());
        assert!(parse("{action}{other}").is_err());
    }

    #[test]
    fn test_error_offsets_are_absolute() {
        let error = parse("good/{bad").unwrap_err();
        // missing closing brace: the EOF of the second slice, offset past 'bad'
        assert_eq!(error, RouteParseError::UnexpectedToken { found: "end of segment".to_string(), offset: 9 });
    }

    #[test]
    fn test_control_byte_propagates_lex_error() {
        assert!(matches!(parse("a/\tb"), Err(RouteParseError::Lex(_))));
    }

    #[test]
    fn test_empty_slice_in_route_is_rejected() {
        assert!(parse("a//b").is_err());
    }
}
