use super::{Flow, Middleware};
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse, StatusCode};

/// Redirects plain-text requests to the listener's first secure prefix.
///
/// Only active when a secure prefix is configured. Halts the request phase
/// so the redirect is sent without routing.
#[derive(Debug, Default)]
pub struct HttpsRedirect;

impl Middleware for HttpsRedirect {
    fn after_request(
        &self,
        listener: &Listener,
        connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        if connection.prefix().secure() {
            return Flow::Continue;
        }
        let Some(secure) = listener.first_secure_prefix() else {
            return Flow::Continue;
        };

        response.set_status(StatusCode::MovedPermanently);
        response.headers_mut().set("Location", format!("https://{}{}", secure.authority(), request.path()));
        Flow::Halt
    }
}
