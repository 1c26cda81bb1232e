use super::{Flow, Middleware};
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse};
use std::time::SystemTime;

/// Stamps every response with an RFC 9110 `Date` header.
#[derive(Debug, Default)]
pub struct DateHeader;

impl Middleware for DateHeader {
    fn before_response(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        _request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        response.headers_mut().set("Date", httpdate::fmt_http_date(SystemTime::now()));
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests_support::{connection, listener, request};

    #[test]
    fn test_date_header_is_imf_fixdate() {
        let mut response = HttpResponse::new();
        DateHeader.before_response(&listener(), &connection(), &request("/"), &mut response);

        let value = response.headers().get("Date").expect("date header");
        // e.g. "Sun, 06 Nov 1994 08:49:37 GMT"
        assert_eq!(value.len(), 29);
        assert!(value.ends_with(" GMT"));
        assert!(httpdate::parse_http_date(value).is_ok());
    }
}
