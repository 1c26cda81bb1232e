//! Connection handling: listener prefixes, the accept loop, TLS wrapping and
//! the per-connection read/decode/dispatch/respond/close lifecycle.

mod context;
mod listener;
mod prefix;

pub use context::{ConnectionContext, ConnectionInfo};
pub use listener::{Listener, StartError};
pub use prefix::ListenerPrefix;
