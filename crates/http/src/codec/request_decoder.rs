//! HTTP request deserialization from a raw byte buffer.
//!
//! The framing model is deliberately strict: a request buffer must contain
//! exactly one CRLFCRLF header/body delimiter. The part before it is the
//! status line plus header lines separated by CRLF; the part after it is the
//! raw body. When a `Content-Length` header is present the body length must
//! match it exactly.

use crate::protocol::{Cookies, HttpMethod, HttpRequest, HttpTarget, HttpVersion, ParseError};
use crate::ensure;
use bytes::Bytes;

const DELIMITER: &[u8] = b"\r\n\r\n";

/// Decoder for complete request buffers.
///
/// Stateless; one call consumes one buffer. Incremental reads are not
/// supported; the connection layer hands over everything it read in one
/// shot.
#[derive(Debug, Default)]
pub struct RequestDecoder;

impl RequestDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, src: &[u8]) -> Result<HttpRequest, ParseError> {
        let occurrences = find_delimiters(src);
        ensure!(occurrences.len() == 1, ParseError::bad_delimiter(occurrences.len()));

        let boundary = occurrences[0];
        let head = &src[..boundary];
        let body = &src[boundary + DELIMITER.len()..];

        let head = std::str::from_utf8(head).map_err(|_| ParseError::invalid_header("header section is not valid utf-8"))?;

        let mut lines = head.split("\r\n");
        // the delimiter search guarantees at least one line
        let status_line = lines.next().unwrap_or_default();
        let mut request = parse_status_line(status_line)?;

        for line in lines {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::invalid_header(format!("header line without colon: '{line}'")))?;
            request.headers_mut().append(name.trim().to_ascii_lowercase(), value.trim());
        }

        if let Some(cookies) = request.headers().get("cookie").map(Cookies::parse) {
            request.set_cookies(cookies);
        }

        if let Some(declared) = request.headers().get("content-length") {
            let declared: usize = declared
                .parse()
                .map_err(|_| ParseError::invalid_header(format!("unparseable content-length: '{declared}'")))?;
            ensure!(declared == body.len(), ParseError::content_length_mismatch(declared, body.len()));
        }

        request.set_body(Bytes::copy_from_slice(body));
        Ok(request)
    }
}

/// Byte offsets of every non-overlapping CRLFCRLF occurrence.
fn find_delimiters(src: &[u8]) -> Vec<usize> {
    let mut occurrences = Vec::new();
    let mut from = 0;
    while from + DELIMITER.len() <= src.len() {
        match src[from..].windows(DELIMITER.len()).position(|window| window == DELIMITER) {
            Some(relative) => {
                occurrences.push(from + relative);
                from += relative + DELIMITER.len();
            }
            None => break,
        }
    }
    occurrences
}

fn parse_status_line(line: &str) -> Result<HttpRequest, ParseError> {
    let tokens: Vec<&str> = line.split(' ').collect();
    ensure!(
        tokens.len() == 3,
        ParseError::invalid_status_line(format!("expected 3 tokens, found {} in '{line}'", tokens.len()))
    );

    let method = HttpMethod::try_from(tokens[0])?;
    let target = HttpTarget::parse(tokens[1])?;
    let version = HttpVersion::try_from(tokens[2])?;

    Ok(HttpRequest::new(method, target, version))
}
