//! Controller-style web framework on top of [`paracord_http`].
//!
//! Routes are declared as slash-separated patterns of constants and
//! `{variable}` segments, optionally with defaults and typed constraints,
//! and dispatched in registration order. A middleware pipeline wraps every
//! request with lifecycle, request and response hooks; content negotiation,
//! entity tags and HTTPS redirection ship as built-in hooks.
//!
//! ```no_run
//! use paracord_web::server::{RouteHandler, Server};
//! use paracord_http::protocol::HttpMethod;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder()
//!         .prefix("http://localhost:8080")?
//!         .register_controller(
//!             "{controller=home}",
//!             vec![RouteHandler::new(
//!                 "{action=index}",
//!                 HttpMethod::Get,
//!                 Arc::new(|_req, _route, response| response.set_body("hello".as_bytes())),
//!             )],
//!         )?
//!         .build();
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod middleware;
pub mod router;
pub mod server;

pub use middleware::{Flow, Middleware, MiddlewarePipeline};
pub use router::{ControllerRoute, ControllerRouteSegment, RouteCollection, RouteValue};
pub use server::{RouteHandler, Server, ServerBuilder};
