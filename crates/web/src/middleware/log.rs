use super::{Flow, Middleware};
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse};
use tracing::info;

/// Emits one structured access log line per handled request.
#[derive(Debug, Default)]
pub struct RequestLog;

impl Middleware for RequestLog {
    fn on_server_started(&self, listener: &Listener) {
        for prefix in listener.prefixes() {
            info!(prefix = %prefix, "server started");
        }
    }

    fn on_server_closed(&self, _listener: &Listener) {
        info!("server closed");
    }

    fn before_response(
        &self,
        _listener: &Listener,
        connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        info!(
            remote = %connection.remote_addr(),
            method = request.method().as_str(),
            path = %request.path(),
            status = response.status().as_u16(),
            latency = ?request.received_at().elapsed(),
            "request handled"
        );
        Flow::Continue
    }
}
