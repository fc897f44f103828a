//! Correlation IDs for generate calls and their upstream log lines.
//!
//! A request arriving without `x-request-id` is given a UUID v4. Whichever ID
//! the request ends up with is echoed on the response and recorded on the
//! request's tracing span.

use http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Span value used when a request somehow has no readable ID.
const MISSING_ID: &str = "-";

/// Issues a fresh UUID v4 for each request without an ID.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().hyphenated().to_string();
        HeaderValue::try_from(id).ok().map(RequestId::new)
    }
}

/// Outer layer: assigns an ID when the client did not send one.
pub fn assign_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid)
}

/// Inner layer: copies the request's ID onto the response.
pub fn echo_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(REQUEST_ID_HEADER)
}

/// The ID to record on a request's tracing span.
pub fn span_request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(MISSING_ID)
}
