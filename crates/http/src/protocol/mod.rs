//! Protocol data model: versions, methods, targets, headers, requests,
//! responses, quality values and the error taxonomy shared by the codec and
//! connection layers.

mod error;
mod headers;
mod method;
mod quality;
mod request;
mod response;
mod target;
mod version;

pub use error::{HttpError, ParseError, SendError};
pub use headers::{Cookies, Headers};
pub use method::{HttpMethod, MethodSet};
pub use quality::QualityValue;
pub use request::HttpRequest;
pub use response::{HttpResponse, StatusCode};
pub use target::HttpTarget;
pub use version::HttpVersion;
