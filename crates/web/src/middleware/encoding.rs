use super::{Flow, Middleware};
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse, QualityValue};
use std::io;
use std::io::Write;
use tracing::trace;

/// Content encoder selected from the client's `Accept-Encoding` preference.
enum Encoder {
    Gzip(GzEncoder<Vec<u8>>),
    Deflate(ZlibEncoder<Vec<u8>>),
    Br(Box<brotli::CompressorWriter<Vec<u8>>>),
}

impl Encoder {
    fn gzip() -> Self {
        Self::Gzip(GzEncoder::new(Vec::new(), Compression::best()))
    }

    fn deflate() -> Self {
        Self::Deflate(ZlibEncoder::new(Vec::new(), Compression::best()))
    }

    fn br() -> Self {
        Self::Br(Box::new(brotli::CompressorWriter::new(
            Vec::new(),
            32 * 1024, // buffer
            3,         // BROTLI_PARAM_QUALITY
            22,        // BROTLI_PARAM_LGWIN
        )))
    }

    /// Picks the most preferred encoding this server supports, honoring the
    /// client's quality ordering.
    fn select(preferences: &[QualityValue]) -> Option<Self> {
        for preference in preferences {
            match preference.value() {
                "gzip" => return Some(Self::gzip()),
                "deflate" => return Some(Self::deflate()),
                "br" => return Some(Self::br()),
                _ => continue,
            }
        }
        None
    }

    fn name(&self) -> &'static str {
        match self {
            Encoder::Gzip(_) => "gzip",
            Encoder::Deflate(_) => "deflate",
            Encoder::Br(_) => "br",
        }
    }

    fn encode(self, data: &[u8]) -> Result<Vec<u8>, io::Error> {
        match self {
            Self::Gzip(mut encoder) => {
                encoder.write_all(data)?;
                encoder.finish()
            }
            Self::Deflate(mut encoder) => {
                encoder.write_all(data)?;
                encoder.finish()
            }
            Self::Br(mut encoder) => {
                encoder.write_all(data)?;
                encoder.flush()?;
                Ok(encoder.into_inner())
            }
        }
    }
}

/// Compresses response bodies per the request's `Accept-Encoding` header
/// and fills in `Content-Type` from the request path extension.
#[derive(Debug, Default)]
pub struct ContentNegotiation;

impl Middleware for ContentNegotiation {
    fn before_response(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        if !response.headers().contains("Content-Type") && !response.body().is_empty() {
            let mime = mime_guess::from_path(request.path()).first_or_octet_stream();
            response.headers_mut().set("Content-Type", mime.essence_str());
        }

        if response.body().is_empty() || response.headers().contains("Content-Encoding") {
            return Flow::Continue;
        }

        let Some(accept_encoding) = request.headers().get("accept-encoding") else {
            return Flow::Continue;
        };
        let preferences = match QualityValue::parse_list(accept_encoding) {
            Ok(preferences) => preferences,
            Err(e) => {
                trace!(cause = %e, "malformed accept-encoding header, skipping compression");
                return Flow::Continue;
            }
        };
        let Some(encoder) = Encoder::select(&preferences) else {
            return Flow::Continue;
        };

        let name = encoder.name();
        match encoder.encode(response.body()) {
            Ok(compressed) => {
                response.headers_mut().set("Content-Length", compressed.len().to_string());
                response.headers_mut().set("Content-Encoding", name);
                response.headers_mut().append("Vary", "Accept-Encoding");
                response.set_body(compressed);
            }
            Err(e) => {
                trace!(cause = %e, encoding = name, "compression failed, sending identity body");
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests_support::{connection, listener, request};
    use std::io::Read;

    fn negotiated(accept_encoding: &str, body: &str) -> HttpResponse {
        let mut req = request("/page.html");
        req.headers_mut().set("accept-encoding", accept_encoding);
        let mut response = HttpResponse::new();
        response.set_body(body.as_bytes());
        ContentNegotiation.before_response(&listener(), &connection(), &req, &mut response);
        response
    }

    #[test]
    fn test_gzip_round_trip() {
        let body = "hello compression ".repeat(64);
        let response = negotiated("gzip", &body);

        assert_eq!(response.headers().get("Content-Encoding"), Some("gzip"));
        assert_eq!(response.headers().get("Vary"), Some("Accept-Encoding"));
        assert_eq!(response.headers().get("Content-Length"), Some(response.body().len().to_string().as_str()));

        let mut decoder = flate2::read::GzDecoder::new(response.body());
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_quality_ordering_wins_over_listing_order() {
        let response = negotiated("gzip;q=0.5, deflate;q=0.9", "payload");
        assert_eq!(response.headers().get("Content-Encoding"), Some("deflate"));
    }

    #[test]
    fn test_unsupported_encodings_leave_body_untouched() {
        let response = negotiated("zstd, compress", "payload");
        assert!(!response.headers().contains("Content-Encoding"));
        assert_eq!(response.body(), b"payload");
    }

    #[test]
    fn test_malformed_header_is_ignored() {
        let response = negotiated("gzip;q=2.0", "payload");
        assert!(!response.headers().contains("Content-Encoding"));
        assert_eq!(response.body(), b"payload");
    }

    #[test]
    fn test_empty_body_is_skipped() {
        let mut req = request("/page.html");
        req.headers_mut().set("accept-encoding", "gzip");
        let mut response = HttpResponse::new();
        ContentNegotiation.before_response(&listener(), &connection(), &req, &mut response);
        assert!(!response.headers().contains("Content-Encoding"));
        assert!(!response.headers().contains("Content-Type"));
    }

    #[test]
    fn test_content_type_from_path_extension() {
        let response = negotiated("identity", "<html></html>");
        assert_eq!(response.headers().get("Content-Type"), Some("text/html"));
    }

    #[test]
    fn test_existing_content_type_is_preserved() {
        let req = request("/page.html");
        let mut response = HttpResponse::new();
        response.set_body("{}".as_bytes());
        response.headers_mut().set("Content-Type", "application/json");
        ContentNegotiation.before_response(&listener(), &connection(), &req, &mut response);
        assert_eq!(response.headers().get("Content-Type"), Some("application/json"));
    }
}
