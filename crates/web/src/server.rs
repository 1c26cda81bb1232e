//! The web server: builder, route registration and request dispatch.

use crate::middleware::{DateHeader, Flow, Middleware, MiddlewarePipeline, RequestLog, ServerHeader};
use crate::router::{ControllerRoute, RouteCollection, RouteConstraint, RouteExecutor, RouteParseError};
use paracord_http::connection::{ConnectionInfo, Listener, ListenerPrefix, StartError};
use paracord_http::handler::Handler;
use paracord_http::protocol::{HttpRequest, HttpResponse, MethodSet, ParseError, StatusCode};
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// One route inside a controller: a pattern relative to the controller
/// prefix, the accepted verbs and the executor.
pub struct RouteHandler {
    pattern: String,
    methods: MethodSet,
    executor: RouteExecutor,
}

impl RouteHandler {
    pub fn new(pattern: impl Into<String>, methods: impl Into<MethodSet>, executor: RouteExecutor) -> Self {
        Self { pattern: pattern.into(), methods: methods.into(), executor }
    }
}

impl std::fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteHandler")
            .field("pattern", &self.pattern)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

pub struct ServerBuilder {
    prefixes: Vec<ListenerPrefix>,
    certificate: Option<TlsAcceptor>,
    routes: RouteCollection,
    middleware: MiddlewarePipeline,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("prefixes", &self.prefixes)
            .field("certificate", &self.certificate.is_some())
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .finish()
    }
}

impl ServerBuilder {
    fn new() -> Self {
        let mut middleware = MiddlewarePipeline::new();
        middleware.register(Box::new(RequestLog));
        middleware.register(Box::new(ServerHeader));
        middleware.register(Box::new(DateHeader));
        Self { prefixes: Vec::new(), certificate: None, routes: RouteCollection::new(), middleware }
    }

    /// Adds a prefix to listen on, parsed as `[protocol://]address[:port]`.
    pub fn prefix(mut self, raw: &str) -> Result<Self, ParseError> {
        self.prefixes.push(ListenerPrefix::parse(raw)?);
        Ok(self)
    }

    /// Installs the TLS acceptor used for secure prefixes.
    pub fn certificate(mut self, acceptor: TlsAcceptor) -> Self {
        self.certificate = Some(acceptor);
        self
    }

    /// Registers a controller: every handler's pattern is appended to the
    /// controller pattern, in the given order.
    pub fn register_controller(
        mut self,
        controller_pattern: &str,
        handlers: Vec<RouteHandler>,
    ) -> Result<Self, RouteParseError> {
        for handler in handlers {
            let route = ControllerRoute::parse(controller_pattern, &handler.pattern, handler.methods, handler.executor)?;
            self.routes.register(route);
        }
        Ok(self)
    }

    /// Registers a single pre-built route.
    pub fn route(mut self, route: ControllerRoute) -> Self {
        self.routes.register(route);
        self
    }

    pub fn middleware(mut self, hook: impl Middleware + 'static) -> Self {
        self.middleware.register(Box::new(hook));
        self
    }

    pub fn constraint(mut self, constraint: Arc<dyn RouteConstraint>) -> Self {
        self.routes.register_constraint(constraint);
        self
    }

    pub fn build(self) -> Server {
        Server {
            listener: Arc::new(Listener::new(self.prefixes, self.certificate)),
            routes: self.routes,
            middleware: self.middleware,
        }
    }
}

pub struct Server {
    listener: Arc<Listener>,
    routes: RouteCollection,
    middleware: MiddlewarePipeline,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("listener", &self.listener)
            .field("routes", &self.routes)
            .field("middleware", &self.middleware)
            .finish()
    }
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn listener(&self) -> &Arc<Listener> {
        &self.listener
    }

    /// Runs the listener until [`Server::stop`] is called.
    pub async fn start(self) -> Result<(), StartError> {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
        tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

        let listener = Arc::clone(&self.listener);
        listener.start(Arc::new(self)).await
    }

    pub fn stop(&self) {
        self.listener.stop();
    }

    fn dispatch(&self, request: &HttpRequest, response: &mut HttpResponse) {
        match self.routes.find(request) {
            Some((route, route_match)) => route.execute(request, &route_match, response),
            None => response.set_status(StatusCode::NotFound),
        }
    }
}

impl Handler for Server {
    fn handle(&self, conn: &ConnectionInfo, request: HttpRequest) -> HttpResponse {
        let mut response = HttpResponse::new();

        // A halted request phase sends the hook's response without routing
        // or the response phase.
        if self.middleware.run_after_request(&self.listener, conn, &request, &mut response) == Flow::Halt {
            return response;
        }

        self.dispatch(&request, &mut response);
        self.middleware.run_before_response(&self.listener, conn, &request, &mut response);
        response
    }

    fn on_started(&self, listener: &Listener) {
        self.middleware.run_server_started(listener);
    }

    fn on_closed(&self, listener: &Listener) {
        self.middleware.run_server_closed(listener);
    }
}
