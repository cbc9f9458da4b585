use crate::tracing::{RequestId, REQUEST_ID_HEADER};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

/// Longest caller-supplied request id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

fn incoming_request_id(request: &Request) -> Option<(RequestId, HeaderValue)> {
    let value = request.headers().get(REQUEST_ID_HEADER)?;
    let text = value.to_str().ok()?.trim();
    if text.is_empty() || text.len() > MAX_REQUEST_ID_LEN {
        return None;
    }
    let header = HeaderValue::from_str(text).ok()?;
    Some((RequestId::new(text), header))
}

fn generated_request_id() -> (RequestId, Option<HeaderValue>) {
    let request_id = RequestId::default();
    let header = HeaderValue::from_str(request_id.as_str()).ok();
    (request_id, header)
}

/// Middleware to add request ID to every request
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    // Reuse the caller's id when it is a usable header value
    let (request_id, header) = match incoming_request_id(&request) {
        Some((id, header)) => (id, Some(header)),
        None => generated_request_id(),
    };

    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);
    if let Some(value) = header.clone() {
        request.headers_mut().insert(header_name.clone(), value);
    }
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = crate::tracing::scope_request_id(
        request_id,
        async move { next.run(request).await }.instrument(span),
    )
    .await;

    if let Some(value) = header {
        response.headers_mut().insert(header_name, value);
    }

    response
}
