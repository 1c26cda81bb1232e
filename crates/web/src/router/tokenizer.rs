//! Lexer for route-definition strings.
//!
//! The grammar is restricted: letters, digits, `=`, `{`, `}` and `/`.
//! Punctuation maps one-to-one to token types, contiguous letter/digit runs
//! form a NAME, and any other printable byte becomes UNKNOWN. Control bytes
//! (anything below 0x20) abort tokenizing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid character {byte:#04x} at offset {offset}")]
pub struct LexError {
    pub byte: u8,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTokenType {
    Eof,
    Equal,
    Slash,
    BraceLeft,
    BraceRight,
    Name,
    Unknown,
}

/// One lexed token with its byte range in the source, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteToken {
    pub token_type: RouteTokenType,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// A cursor over one route-definition string.
///
/// `set_source` rewinds the cursor; the token sequence is lazy, finite and
/// not restartable other than through a new `set_source` call. Once the end
/// is reached, `next_token` keeps returning EOF.
#[derive(Debug, Default)]
pub struct RouteTokenizer {
    source: String,
    cursor: usize,
}

impl RouteTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_source(&mut self, text: &str) {
        self.source = text.to_string();
        self.cursor = 0;
    }

    pub fn next_token(&mut self) -> Result<RouteToken, LexError> {
        let bytes = self.source.as_bytes();
        if self.cursor >= bytes.len() {
            return Ok(RouteToken {
                token_type: RouteTokenType::Eof,
                value: String::new(),
                start: bytes.len(),
                end: bytes.len(),
            });
        }

        let start = self.cursor;
        let byte = bytes[start];

        if byte < 0x20 {
            return Err(LexError { byte, offset: start });
        }

        let token_type = match byte {
            b'=' => RouteTokenType::Equal,
            b'/' => RouteTokenType::Slash,
            b'{' => RouteTokenType::BraceLeft,
            b'}' => RouteTokenType::BraceRight,
            b if b.is_ascii_alphanumeric() => {
                let mut end = start + 1;
                while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                    end += 1;
                }
                self.cursor = end;
                return Ok(RouteToken {
                    token_type: RouteTokenType::Name,
                    value: self.source[start..end].to_string(),
                    start,
                    end,
                });
            }
            _ => RouteTokenType::Unknown,
        };

        self.cursor = start + 1;
        Ok(RouteToken { token_type, value: self.source[start..start + 1].to_string(), start, end: start + 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<RouteToken> {
        let mut tokenizer = RouteTokenizer::new();
        tokenizer.set_source(source);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token().unwrap();
            let done = token.token_type == RouteTokenType::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_lex_variable_with_default() {
        let tokens = lex_all("{controller=index}");
        let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                RouteTokenType::BraceLeft,
                RouteTokenType::Name,
                RouteTokenType::Equal,
                RouteTokenType::Name,
                RouteTokenType::BraceRight,
                RouteTokenType::Eof,
            ]
        );
        assert_eq!(tokens[1].value, "controller");
        assert_eq!(tokens[3].value, "index");
    }

    #[test]
    fn test_token_offsets() {
        let tokens = lex_all("{action}");
        assert_eq!((tokens[0].start, tokens[0].end), (0, 1));
        assert_eq!((tokens[1].start, tokens[1].end), (1, 7));
        assert_eq!((tokens[2].start, tokens[2].end), (7, 8));
    }

    #[test]
    fn test_name_runs_include_digits() {
        let tokens = lex_all("v2api");
        assert_eq!(tokens[0].token_type, RouteTokenType::Name);
        assert_eq!(tokens[0].value, "v2api");
    }

    #[test]
    fn test_slash_token() {
        let tokens = lex_all("a/b");
        let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(types, vec![RouteTokenType::Name, RouteTokenType::Slash, RouteTokenType::Name, RouteTokenType::Eof]);
    }

    #[test]
    fn test_unknown_byte() {
        let tokens = lex_all("a:b");
        assert_eq!(tokens[1].token_type, RouteTokenType::Unknown);
        assert_eq!(tokens[1].value, ":");
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut tokenizer = RouteTokenizer::new();
        tokenizer.set_source("a");
        assert_eq!(tokenizer.next_token().unwrap().token_type, RouteTokenType::Name);
        assert_eq!(tokenizer.next_token().unwrap().token_type, RouteTokenType::Eof);
        assert_eq!(tokenizer.next_token().unwrap().token_type, RouteTokenType::Eof);
    }

    #[test]
    fn test_control_byte_is_fatal() {
        let mut tokenizer = RouteTokenizer::new();
        tokenizer.set_source("ab\ncd");
        assert_eq!(tokenizer.next_token().unwrap().value, "ab");
        let error = tokenizer.next_token().unwrap_err();
        assert_eq!(error, LexError { byte: b'\n', offset: 2 });
    }

    #[test]
    fn test_set_source_rewinds() {
        let mut tokenizer = RouteTokenizer::new();
        tokenizer.set_source("abc");
        let _ = tokenizer.next_token().unwrap();
        tokenizer.set_source("xyz");
        assert_eq!(tokenizer.next_token().unwrap().value, "xyz");
    }
}
