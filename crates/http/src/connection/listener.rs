use crate::connection::{ConnectionContext, ConnectionInfo, ListenerPrefix};
use crate::handler::Handler;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartError {
    #[error("secure prefix '{prefix}' configured without a certificate")]
    MissingCertificate { prefix: String },

    #[error("failed to bind '{prefix}': {source}")]
    Bind { prefix: String, source: io::Error },
}

/// Accepts TCP connections on a set of prefixes and hands each one to a
/// [`Handler`] on its own task.
///
/// The listener is `Closed` until [`Listener::start`] binds a socket per
/// prefix and transitions it to open; [`Listener::stop`] cancels the accept
/// loops and is idempotent, so it is safe to call from a ctrl-c signal task.
/// In-flight connections are not interrupted by `stop`; only the accept
/// loops end.
pub struct Listener {
    prefixes: Vec<ListenerPrefix>,
    tls: Option<TlsAcceptor>,
    open: AtomicBool,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("prefixes", &self.prefixes)
            .field("tls", &self.tls.is_some())
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl Listener {
    /// Creates a listener over `prefixes`. An empty set falls back to
    /// `http://localhost:8080`, plus `https://localhost:8443` when a
    /// certificate is supplied.
    pub fn new(prefixes: Vec<ListenerPrefix>, tls: Option<TlsAcceptor>) -> Self {
        let prefixes = if prefixes.is_empty() {
            let mut defaults = vec![ListenerPrefix::default_http()];
            if tls.is_some() {
                defaults.push(ListenerPrefix::default_https());
            }
            defaults
        } else {
            prefixes
        };

        Self { prefixes, tls, open: AtomicBool::new(false), shutdown: CancellationToken::new() }
    }

    pub fn prefixes(&self) -> &[ListenerPrefix] {
        &self.prefixes
    }

    /// The first secure prefix in registration order, if any.
    pub fn first_secure_prefix(&self) -> Option<&ListenerPrefix> {
        self.prefixes.iter().find(|prefix| prefix.secure())
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Stops accepting new connections. No-op when already closed.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Binds every prefix and runs the accept loops until [`Listener::stop`]
    /// is called. No-op when already open.
    ///
    /// Fails before binding anything when a secure prefix is configured
    /// without a certificate: that is an API misuse, not a runtime
    /// condition to limp through.
    pub async fn start<H: Handler>(self: Arc<Self>, handler: Arc<H>) -> Result<(), StartError> {
        if let Some(prefix) = self.prefixes.iter().find(|prefix| prefix.secure())
            && self.tls.is_none()
        {
            return Err(StartError::MissingCertificate { prefix: prefix.to_string() });
        }

        if self.open.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut bound = Vec::with_capacity(self.prefixes.len());
        for prefix in &self.prefixes {
            let tcp_listener = TcpListener::bind(prefix.bind_address())
                .await
                .map_err(|source| StartError::Bind { prefix: prefix.to_string(), source })?;
            info!(prefix = %prefix, "start listening");
            bound.push((tcp_listener, prefix.clone()));
        }

        handler.on_started(&self);

        let mut accept_loops = Vec::with_capacity(bound.len());
        for (tcp_listener, prefix) in bound {
            let listener = Arc::clone(&self);
            let handler = Arc::clone(&handler);
            accept_loops.push(tokio::spawn(accept_loop(listener, tcp_listener, prefix, handler)));
        }

        for accept in accept_loops {
            if let Err(e) = accept.await {
                error!(cause = %e, "accept loop aborted");
            }
        }

        handler.on_closed(&self);
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }
}

async fn accept_loop<H: Handler>(
    listener: Arc<Listener>,
    tcp_listener: TcpListener,
    prefix: ListenerPrefix,
    handler: Arc<H>,
) {
    loop {
        select! {
            _ = listener.shutdown.cancelled() => {
                info!(prefix = %prefix, "listener stopped");
                return;
            }
            accepted = tcp_listener.accept() => {
                let (tcp_stream, remote_addr) = match accepted {
                    Ok(stream_and_addr) => stream_and_addr,
                    Err(e) => {
                        warn!(cause = %e, "failed to accept");
                        continue;
                    }
                };

                let listener = Arc::clone(&listener);
                let handler = Arc::clone(&handler);
                let prefix = prefix.clone();
                tokio::spawn(async move {
                    handle_connection(listener, tcp_stream, remote_addr, prefix, handler).await;
                });
            }
        }
    }
}

async fn handle_connection<H: Handler>(
    listener: Arc<Listener>,
    tcp_stream: TcpStream,
    remote_addr: SocketAddr,
    prefix: ListenerPrefix,
    handler: Arc<H>,
) {
    let secure = prefix.secure();
    let info = ConnectionInfo::new(prefix, remote_addr);

    let result = if secure {
        // presence checked in start()
        let Some(acceptor) = listener.tls.clone() else {
            error!("secure prefix without tls acceptor, dropping connection");
            return;
        };
        match acceptor.accept(tcp_stream).await {
            Ok(tls_stream) => ConnectionContext::new(tls_stream, info).process(handler.as_ref()).await,
            Err(e) => {
                error!(cause = %e, "tls handshake failed");
                return;
            }
        }
    } else {
        ConnectionContext::new(tcp_stream, info).process(handler.as_ref()).await
    };

    match result {
        Ok(()) => info!(remote = %remote_addr, "finished process, connection shutdown"),
        Err(e) => error!(remote = %remote_addr, cause = %e, "connection failed, connection shutdown"),
    }
}
