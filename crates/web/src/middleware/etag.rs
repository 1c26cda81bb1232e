use super::{Flow, Middleware};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use paracord_http::connection::{ConnectionInfo, Listener};
use paracord_http::protocol::{HttpRequest, HttpResponse, StatusCode};
use sha2::{Digest, Sha256};

/// Bodies larger than this are not hashed.
const MAX_HASHED_BODY_BYTES: usize = 32 * 1024;

/// Computes a content-derived `ETag` for small successful responses and
/// honors `If-None-Match` preconditions.
///
/// The tag is the base64 SHA-256 digest of the body, wrapped in double
/// quotes. Empty bodies are deliberately not tagged: a digest of nothing
/// identifies nothing. A request carrying `If-None-Match` with a value that
/// differs from the computed tag fails the precondition with 412; the
/// computed tag is kept on the response so the client can resynchronize,
/// and the body plus its content headers are dropped since the
/// precondition failure supersedes the representation.
#[derive(Debug, Default)]
pub struct EntityTag;

impl Middleware for EntityTag {
    fn before_response(
        &self,
        _listener: &Listener,
        _connection: &ConnectionInfo,
        request: &HttpRequest,
        response: &mut HttpResponse,
    ) -> Flow {
        if !response.status().is_success()
            || response.headers().contains("ETag")
            || response.body().is_empty()
            || response.body().len() > MAX_HASHED_BODY_BYTES
        {
            return Flow::Continue;
        }

        let digest = Sha256::digest(response.body());
        let tag = format!("\"{}\"", STANDARD.encode(digest));

        if let Some(expected) = request.headers().get("if-none-match")
            && expected != tag
        {
            response.set_status(StatusCode::PreconditionFailed);
            response.set_body(Vec::new());
            // an earlier response hook may have pinned these to the body
            // that was just dropped
            response.headers_mut().remove("Content-Length");
            response.headers_mut().remove("Content-Encoding");
        }
        response.headers_mut().set("ETag", tag);
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::tests_support::{connection, listener, request};

    const PEBCAK_TAG: &str = "\"ksm17orqgGGqa3+l55bZMpfEkbhN6GbWHK41YF08DgE=\"";

    #[test]
    fn test_etag_is_quoted_base64_sha256() {
        let mut response = HttpResponse::new();
        response.set_body("PEBCAK".as_bytes());
        EntityTag.before_response(&listener(), &connection(), &request("/"), &mut response);
        assert_eq!(response.headers().get("ETag"), Some(PEBCAK_TAG));
        assert_eq!(response.status(), StatusCode::Ok);
    }

    #[test]
    fn test_if_none_match_hit_passes_through() {
        let mut req = request("/");
        req.headers_mut().set("if-none-match", PEBCAK_TAG);
        let mut response = HttpResponse::new();
        response.set_body("PEBCAK".as_bytes());

        EntityTag.before_response(&listener(), &connection(), &req, &mut response);
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"PEBCAK");
    }

    #[test]
    fn test_if_none_match_mismatch_fails_precondition() {
        let mut req = request("/");
        req.headers_mut().set("if-none-match", "\"stale\"");
        let mut response = HttpResponse::new();
        response.set_body("PEBCAK".as_bytes());

        EntityTag.before_response(&listener(), &connection(), &req, &mut response);
        assert_eq!(response.status(), StatusCode::PreconditionFailed);
        assert!(response.body().is_empty());
        assert_eq!(response.headers().get("ETag"), Some(PEBCAK_TAG));
    }

    #[test]
    fn test_precondition_failure_after_compression_stays_encodable() {
        use crate::middleware::ContentNegotiation;
        use paracord_http::codec::ResponseEncoder;

        let mut req = request("/report.txt");
        req.headers_mut().set("accept-encoding", "gzip");
        req.headers_mut().set("if-none-match", "\"stale\"");
        let mut response = HttpResponse::new();
        response.set_body("a body large enough to be worth compressing".repeat(4));

        // reverse registration order: the negotiation hook pins
        // Content-Length to the compressed body before the tag hook runs
        ContentNegotiation.before_response(&listener(), &connection(), &req, &mut response);
        assert!(response.headers().contains("Content-Length"));
        EntityTag.before_response(&listener(), &connection(), &req, &mut response);

        assert_eq!(response.status(), StatusCode::PreconditionFailed);
        assert!(response.body().is_empty());
        assert!(!response.headers().contains("Content-Length"));
        assert!(!response.headers().contains("Content-Encoding"));
        assert!(response.headers().contains("ETag"));

        let bytes = ResponseEncoder::new().encode(&mut response);
        assert!(bytes.starts_with(b"HTTP/1.1 412\r\n"));
    }

    #[test]
    fn test_empty_and_error_responses_are_skipped() {
        let mut empty = HttpResponse::new();
        EntityTag.before_response(&listener(), &connection(), &request("/"), &mut empty);
        assert!(!empty.headers().contains("ETag"));

        let mut failed = HttpResponse::with_status(StatusCode::NotFound);
        failed.set_body("missing".as_bytes());
        EntityTag.before_response(&listener(), &connection(), &request("/"), &mut failed);
        assert!(!failed.headers().contains("ETag"));
    }

    #[test]
    fn test_oversized_body_is_not_hashed() {
        let mut response = HttpResponse::new();
        response.set_body(vec![b'x'; MAX_HASHED_BODY_BYTES + 1]);
        EntityTag.before_response(&listener(), &connection(), &request("/"), &mut response);
        assert!(!response.headers().contains("ETag"));
    }

    #[test]
    fn test_existing_etag_is_preserved() {
        let mut response = HttpResponse::new();
        response.set_body("PEBCAK".as_bytes());
        response.headers_mut().set("ETag", "\"pinned\"");
        EntityTag.before_response(&listener(), &connection(), &request("/"), &mut response);
        assert_eq!(response.headers().get("ETag"), Some("\"pinned\""));
    }
}
