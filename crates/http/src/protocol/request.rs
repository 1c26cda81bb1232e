use crate::protocol::{Cookies, Headers, HttpMethod, HttpTarget, HttpVersion};
use bytes::Bytes;
use std::time::Instant;

/// A fully deserialized HTTP request.
///
/// Owned by the connection that read it; mutated only during
/// deserialization and by the application handler.
#[derive(Debug)]
pub struct HttpRequest {
    method: HttpMethod,
    target: HttpTarget,
    version: HttpVersion,
    headers: Headers,
    cookies: Cookies,
    body: Bytes,
    received_at: Instant,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, target: HttpTarget, version: HttpVersion) -> Self {
        Self {
            method,
            target,
            version,
            headers: Headers::new(),
            cookies: Cookies::new(),
            body: Bytes::new(),
            received_at: Instant::now(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn target(&self) -> &HttpTarget {
        &self.target
    }

    pub fn path(&self) -> String {
        self.target.path()
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    pub fn set_cookies(&mut self, cookies: Cookies) {
        self.cookies = cookies;
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    /// Body length in bytes. The decoder guarantees this equals the
    /// `Content-Length` header when one was present.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn received_at(&self) -> Instant {
        self.received_at
    }
}
