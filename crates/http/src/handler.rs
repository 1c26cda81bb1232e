//! The seam between the connection layer and the application.

use crate::connection::{ConnectionInfo, Listener};
use crate::protocol::{HttpRequest, HttpResponse};

/// Turns one parsed request into a response.
///
/// A handler is shared across all connections and must therefore be
/// internally immutable. Request handling is fully synchronous: the
/// connection task blocks on `handle` and then writes the returned response.
/// The lifecycle notifications fire once per listener start/stop.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, conn: &ConnectionInfo, request: HttpRequest) -> HttpResponse;

    fn on_started(&self, _listener: &Listener) {}

    fn on_closed(&self, _listener: &Listener) {}
}

/// Adapts a plain function or closure into a [`Handler`].
pub fn make_handler<F>(f: F) -> FnHandler<F>
where
    F: Fn(&ConnectionInfo, HttpRequest) -> HttpResponse + Send + Sync + 'static,
{
    FnHandler { f }
}

#[derive(Debug)]
pub struct FnHandler<F> {
    f: F,
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&ConnectionInfo, HttpRequest) -> HttpResponse + Send + Sync + 'static,
{
    fn handle(&self, conn: &ConnectionInfo, request: HttpRequest) -> HttpResponse {
        (self.f)(conn, request)
    }
}
