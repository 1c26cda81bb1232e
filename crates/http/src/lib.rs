//! A minimal, from-scratch HTTP/1.1 server stack
//!
//! This crate provides the wire-level half of paracord: a byte-exact
//! request parser and response serializer, the protocol data model, and a
//! TCP/TLS listener that drives one connection per task. Routing and the
//! middleware pipeline live in `paracord-web`, which plugs in through the
//! [`handler::Handler`] trait.
//!
//! # Features
//!
//! - Strict HTTP/1.1 framing: CRLF lines, a single CRLFCRLF header/body
//!   delimiter, exact `Content-Length` enforcement
//! - Case-insensitive, insertion-ordered header map
//! - Listener prefixes (`[protocol://]address[:port]`) with optional TLS
//!   via rustls
//! - Task-per-connection accept loop on tokio with idempotent shutdown
//!
//! Connections are single-shot: one request, one response, then the socket
//! is closed. Chunked transfer encoding, keep-alive reuse and HTTP/2+ are
//! out of scope.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//! use paracord_http::connection::{ConnectionInfo, Listener, ListenerPrefix};
//! use paracord_http::handler::make_handler;
//! use paracord_http::protocol::{HttpRequest, HttpResponse};
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     let prefix = ListenerPrefix::parse("http://127.0.0.1:8080").unwrap();
//!     let listener = Arc::new(Listener::new(vec![prefix], None));
//!     if let Err(e) = listener.start(handler).await {
//!         eprintln!("failed to start listener: {e}");
//!     }
//! }
//!
//! fn hello_world(_conn: &ConnectionInfo, request: HttpRequest) -> HttpResponse {
//!     let mut response = HttpResponse::new();
//!     response.set_body(format!("Hello from {}!\r\n", request.path()));
//!     response
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: data model (version, method, target, headers, request,
//!   response, quality values) and the error taxonomy
//! - [`codec`]: request decoding and response encoding
//! - [`connection`]: prefixes, the listener and the per-connection context
//! - [`handler`]: the trait the application layer implements

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
