use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::connection::ListenerPrefix;
use crate::handler::Handler;
use crate::protocol::{HttpError, HttpResponse, ParseError, SendError, StatusCode};
use bytes::BytesMut;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

/// How much a single read can take from the socket.
const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Immutable facts about one accepted connection, shared with the handler.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    prefix: ListenerPrefix,
    remote_addr: SocketAddr,
}

impl ConnectionInfo {
    pub fn new(prefix: ListenerPrefix, remote_addr: SocketAddr) -> Self {
        Self { prefix, remote_addr }
    }

    /// The prefix this connection arrived on.
    pub fn prefix(&self) -> &ListenerPrefix {
        &self.prefix
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

/// Per-connection state machine: read, decode, dispatch, respond, close.
///
/// The stream is read once, taking whatever bytes the socket currently has.
/// A request split across TCP segments whose remainder arrives after that
/// read is not reassembled; the decoder then fails and the connection is
/// closed with a best-effort error response. Connections are never reused:
/// after one response the socket is shut down.
pub struct ConnectionContext<S> {
    stream: S,
    info: ConnectionInfo,
}

impl<S> std::fmt::Debug for ConnectionContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionContext").field("info", &self.info).finish_non_exhaustive()
    }
}

impl<S> ConnectionContext<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, info: ConnectionInfo) -> Self {
        Self { stream, info }
    }

    pub async fn process<H: Handler>(mut self, handler: &H) -> Result<(), HttpError> {
        let mut buf = BytesMut::with_capacity(READ_BUFFER_BYTES);
        let read = self.stream.read_buf(&mut buf).await.map_err(ParseError::io)?;
        if read == 0 {
            debug!("peer closed before sending any bytes");
            return Ok(());
        }

        let request = match RequestDecoder::new().decode(&buf) {
            Ok(request) => request,
            Err(e) => {
                error!(cause = %e, "failed to parse request");
                let mut error_response = build_error_response(&e);
                self.send(&mut error_response).await?;
                return Err(e.into());
            }
        };

        let mut response = handler.handle(&self.info, request);
        self.send(&mut response).await?;
        Ok(())
    }

    async fn send(&mut self, response: &mut HttpResponse) -> Result<(), SendError> {
        let bytes = ResponseEncoder::new().encode(response);
        self.stream.write_all(&bytes).await.map_err(SendError::io)?;
        self.stream.flush().await.map_err(SendError::io)?;
        self.stream.shutdown().await.map_err(SendError::io)?;
        Ok(())
    }
}

fn build_error_response(error: &ParseError) -> HttpResponse {
    let status = match error {
        ParseError::VerbNotImplemented { .. } => StatusCode::NotImplemented,
        _ => StatusCode::BadRequest,
    };
    HttpResponse::with_status(status)
}
