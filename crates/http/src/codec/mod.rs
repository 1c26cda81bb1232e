//! Wire codec: byte-exact request deserialization and response
//! serialization. Framing constants are CRLF line terminators and a single
//! CRLFCRLF header/body delimiter.

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
