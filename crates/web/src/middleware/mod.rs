//! Middleware pipeline: lifecycle and per-request hooks executed around
//! route dispatch.
//!
//! Request hooks run in registration order; response hooks run in reverse
//! registration order so the first-registered hook sees the final response.
//! A hook returns [`Flow::Halt`] to short-circuit the remainder of its
//! phase.

pub mod date;
pub mod encoding;
pub mod etag;
pub mod https_redirect;
pub mod log;
pub mod server_header;

pub use date::DateHeader;
pub use encoding::ContentNegotiation;
pub use etag::EntityTag;
pub use https_redirect::HttpsRedirect;
pub use log::RequestLog;
pub use server_header::ServerHeader;

use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse};

/// Whether hook execution continues to the next registered hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Hooks into the server lifecycle and the request/response cycle.
///
/// All methods default to no-ops so implementors override only the phases
/// they care about.
pub trait Middleware: Send + Sync {
    fn on_server_started(&self, _listener: &Listener) {}

    fn on_server_closed(&self, _listener: &Listener) {}

    /// Runs after the request is decoded, before routing.
    fn after_request(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        _request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Flow {
        Flow::Continue
    }

    /// Runs after the route executor, before the response is encoded.
    fn before_response(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        _request: &HttpRequest,
        _response: &mut HttpResponse,
    ) -> Flow {
        Flow::Continue
    }
}

/// Registration-ordered list of middleware hooks.
#[derive(Default)]
pub struct MiddlewarePipeline {
    hooks: Vec<Box<dyn Middleware>>,
}

impl std::fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewarePipeline").field("hooks", &self.hooks.len()).finish()
    }
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    pub fn register(&mut self, hook: Box<dyn Middleware>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn run_server_started(&self, listener: &Listener) {
        for hook in &self.hooks {
            hook.on_server_started(listener);
        }
    }

    pub fn run_server_closed(&self, listener: &Listener) {
        for hook in &self.hooks {
            hook.on_server_closed(listener);
        }
    }

    pub fn run_after_request(
        &self,
        listener: &Listener,
        connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        for hook in &self.hooks {
            if hook.after_request(listener, connection, request, response) == Flow::Halt {
                return Flow::Halt;
            }
        }
        Flow::Continue
    }

    pub fn run_before_response(
        &self,
        listener: &Listener,
        connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        for hook in self.hooks.iter().rev() {
            if hook.before_response(listener, connection, request, response) == Flow::Halt {
                return Flow::Halt;
            }
        }
        Flow::Continue
    }
}


#[cfg(test)]
mod tests {
    use super::tests_support::{connection, listener};
    use super::*;
    use paracord_http::protocol::{HttpMethod, HttpTarget, HttpVersion};
    use std::sync::Mutex;

    fn request() -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, HttpTarget::parse("/").unwrap(), HttpVersion::HTTP_1_1)
    }

    struct Recorder {
        label: &'static str,
        order: std::sync::Arc<Mutex<Vec<&'static str>>>,
        halt_after_request: bool,
    }

    impl Middleware for Recorder {
        fn after_request(
            &self,
            _listener: &Listener,
            _connection: &ConnectionInfo,
            _request: &HttpRequest,
            _response: &mut HttpResponse,
        ) -> Flow {
            self.order.lock().unwrap().push(self.label);
            if self.halt_after_request { Flow::Halt } else { Flow::Continue }
        }

        fn before_response(
            &self,
            _listener: &Listener,
            _connection: &ConnectionInfo,
            _request: &HttpRequest,
            _response: &mut HttpResponse,
        ) -> Flow {
            self.order.lock().unwrap().push(self.label);
            Flow::Continue
        }
    }

    #[test]
    fn test_after_request_runs_in_registration_order() {
        let order = std::sync::Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = MiddlewarePipeline::new();
        pipeline.register(Box::new(Recorder { label: "a", order: order.clone(), halt_after_request: false }));
        pipeline.register(Box::new(Recorder { label: "b", order: order.clone(), halt_after_request: false }));

        let flow = pipeline.run_after_request(&listener(), &connection(), &request(), &mut HttpResponse::new());
        assert_eq!(flow, Flow::Continue);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_before_response_runs_in_reverse_order() {
        let order = std::sync::Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = MiddlewarePipeline::new();
        pipeline.register(Box::new(Recorder { label: "a", order: order.clone(), halt_after_request: false }));
        pipeline.register(Box::new(Recorder { label: "b", order: order.clone(), halt_after_request: false }));

        pipeline.run_before_response(&listener(), &connection(), &request(), &mut HttpResponse::new());
        assert_eq!(*order.lock().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_halt_short_circuits_remaining_hooks() {
        let order = std::sync::Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = MiddlewarePipeline::new();
        pipeline.register(Box::new(Recorder { label: "a", order: order.clone(), halt_after_request: true }));
        pipeline.register(Box::new(Recorder { label: "b", order: order.clone(), halt_after_request: false }));

        let flow = pipeline.run_after_request(&listener(), &connection(), &request(), &mut HttpResponse::new());
        assert_eq!(flow, Flow::Halt);
        assert_eq!(*order.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_default_hook_methods_continue() {
        struct Passive;
        impl Middleware for Passive {}

        let mut pipeline = MiddlewarePipeline::new();
        pipeline.register(Box::new(Passive));
        let flow = pipeline.run_after_request(&listener(), &connection(), &request(), &mut HttpResponse::new());
        assert_eq!(flow, Flow::Continue);
    }
}
