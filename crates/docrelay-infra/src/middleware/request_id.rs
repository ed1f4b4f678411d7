use axum::http::{HeaderMap, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID extension type
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Tags every request with an id for log correlation. A non-empty `X-Request-ID` from
/// the client is kept as is; otherwise a v4 UUID is assigned. Handlers read it through
/// the `RequestId` extension and clients get it back on every response, errors included.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers())
        .unwrap_or_else(|| RequestId(Uuid::new_v4().to_string()));
    let echoed = HeaderValue::from_str(&request_id.0).ok();

    request.extensions_mut().insert(request_id);
    let mut response = next.run(request).await;

    if let Some(value) = echoed {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn incoming_request_id(headers: &HeaderMap) -> Option<RequestId> {
    let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| RequestId(value.to_string()))
}
