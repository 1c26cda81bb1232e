use super::{Flow, Middleware};
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse};

const SERVER_NAME: &str = "Paracord";

/// Stamps every response with a `Server` header.
#[derive(Debug, Default)]
pub struct ServerHeader;

impl Middleware for ServerHeader {
    fn before_response(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        _request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        response.headers_mut().set("Server", SERVER_NAME);
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests_support::{connection, listener, request};

    #[test]
    fn test_server_header_is_set() {
        let mut response = HttpResponse::new();
        ServerHeader.before_response(&listener(), &connection(), &request("/"), &mut response);
        assert_eq!(response.headers().get("Server"), Some("Paracord"));
    }

    #[test]
    fn test_existing_server_header_is_replaced() {
        let mut response = HttpResponse::new();
        response.headers_mut().set("Server", "other/1.0");
        ServerHeader.before_response(&listener(), &connection(), &request("/"), &mut response);
        assert_eq!(response.headers().get("Server"), Some("Paracord"));
    }
}
