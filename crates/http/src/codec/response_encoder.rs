//! HTTP response serialization.
//!
//! A conformant response serializes deterministically: status line without a
//! reason phrase, headers in insertion order, one `Set-Cookie` line per
//! cookie, the CRLFCRLF delimiter, then the body verbatim.

use crate::protocol::HttpResponse;
use bytes::{BufMut, Bytes, BytesMut};

/// Encoder for complete responses.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Serializes `response` to wire bytes.
    ///
    /// Reconciles `Content-Length` first: a missing header is filled in from
    /// the body length (only when the body is non-empty), and a present
    /// header that disagrees with the body length is a contract violation
    /// that panics before any bytes are produced.
    pub fn encode(&self, response: &mut HttpResponse) -> Bytes {
        reconcile_content_length(response);

        let mut dst = BytesMut::with_capacity(256 + response.body().len());

        dst.put_slice(response.version().to_string().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(response.status().to_string().as_bytes());

        for (name, value) in response.headers().iter() {
            dst.put_slice(b"\r\n");
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
        }

        for (name, value) in response.cookies().iter() {
            dst.put_slice(b"\r\nSet-Cookie: ");
            dst.put_slice(name.as_bytes());
            dst.put_u8(b'=');
            dst.put_slice(value.as_bytes());
        }

        dst.put_slice(b"\r\n\r\n");
        dst.put_slice(response.body());

        dst.freeze()
    }
}

/// Checked exactly once, immediately before serialization. A header that
/// disagrees with the body is a fatal framing bug, not a recoverable error.
fn reconcile_content_length(response: &mut HttpResponse) {
    let body_len = response.body().len();
    if let Some(declared) = response.headers().get("content-length") {
        let parsed: Option<usize> = declared.parse().ok();
        if parsed != Some(body_len) {
            panic!("content-length header '{declared}' does not match actual body length {body_len}");
        }
    } else if body_len > 0 {
        response.headers_mut().set("Content-Length", body_len.to_string());
    }
}
