use std::io;
use thiserror::Error;

/// Umbrella error for a single connection's lifecycle.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

/// Errors raised while turning raw bytes into structured protocol values.
///
/// All of these are recoverable per-connection: the connection layer closes
/// the offending socket and the listener keeps running.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed framing: expected exactly one CRLFCRLF delimiter, found {count}")]
    BadDelimiter { count: usize },

    #[error("invalid status line: {reason}")]
    InvalidStatusLine { reason: String },

    #[error("http verb not implemented: {verb}")]
    VerbNotImplemented { verb: String },

    #[error("invalid http version: {input}")]
    InvalidVersion { input: String },

    #[error("invalid header line: {reason}")]
    InvalidHeader { reason: String },

    #[error("content-length header says {declared} but body has {actual} bytes")]
    ContentLengthMismatch { declared: usize, actual: usize },

    #[error("invalid request target: {reason}")]
    InvalidTarget { reason: String },

    #[error("invalid quality value: {reason}")]
    InvalidQuality { reason: String },

    #[error("invalid listener prefix: {reason}")]
    InvalidPrefix { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn bad_delimiter(count: usize) -> Self {
        Self::BadDelimiter { count }
    }

    pub fn invalid_status_line<S: ToString>(reason: S) -> Self {
        Self::InvalidStatusLine { reason: reason.to_string() }
    }

    pub fn verb_not_implemented<S: ToString>(verb: S) -> Self {
        Self::VerbNotImplemented { verb: verb.to_string() }
    }

    pub fn invalid_version<S: ToString>(input: S) -> Self {
        Self::InvalidVersion { input: input.to_string() }
    }

    pub fn invalid_header<S: ToString>(reason: S) -> Self {
        Self::InvalidHeader { reason: reason.to_string() }
    }

    pub fn content_length_mismatch(declared: usize, actual: usize) -> Self {
        Self::ContentLengthMismatch { declared, actual }
    }

    pub fn invalid_target<S: ToString>(reason: S) -> Self {
        Self::InvalidTarget { reason: reason.to_string() }
    }

    pub fn invalid_quality<S: ToString>(reason: S) -> Self {
        Self::InvalidQuality { reason: reason.to_string() }
    }

    pub fn invalid_prefix<S: ToString>(reason: S) -> Self {
        Self::InvalidPrefix { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while writing a response back to the peer.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
