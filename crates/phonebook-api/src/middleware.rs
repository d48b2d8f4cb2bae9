//! Request logging middleware.
//!
//! `RequestLogLayer` buffers each request body so it can be logged next to
//! the outcome, then hands an identical body to the inner service. One line
//! per request:
//!
//! ```text
//! POST /api/persons 200 61 - 0.412 ms {"name":"Ada Lovelace","number":"39-44-5323523"}
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Method, Request, StatusCode, Uri, header};
use axum::response::IntoResponse;
use tower::{Layer, Service};

/// Largest request body accepted (and logged), matching common JSON body parser limits.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Tower `Layer` that logs one line per request.
#[derive(Clone, Debug, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    /// Create a new logging layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService { inner }
    }
}

/// Tower `Service` produced by [`RequestLogLayer`].
#[derive(Clone, Debug)]
pub struct RequestLogService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestLogService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let started = Instant::now();
            let method = req.method().clone();
            let uri = req.uri().clone();

            let (parts, body) = req.into_parts();
            let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(%method, %uri, error = %err, "request body rejected");
                    return Ok(StatusCode::PAYLOAD_TOO_LARGE.into_response());
                }
            };
            let logged_body = body_for_log(&bytes);

            let req = Request::from_parts(parts, Body::from(bytes));
            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {})
                .into_response();

            let line = log_line(
                &method,
                &uri,
                resp.status(),
                &response_length(&resp),
                started.elapsed().as_secs_f64() * 1000.0,
                &logged_body,
            );
            tracing::info!(target: "phonebook::http", "{line}");

            Ok(resp)
        })
    }
}

/// `METHOD URI STATUS LEN - ELAPSED ms BODY`
fn log_line(
    method: &Method,
    uri: &Uri,
    status: StatusCode,
    length: &str,
    elapsed_ms: f64,
    body: &str,
) -> String {
    format!(
        "{method} {uri} {} {length} - {elapsed_ms:.3} ms {body}",
        status.as_u16()
    )
}

/// Compact JSON for JSON bodies, `{}` for empty ones, lossy text otherwise.
fn body_for_log(bytes: &Bytes) -> String {
    if bytes.is_empty() {
        return "{}".to_string();
    }
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Content-Length header if set, else the body's exact size, else `-`.
fn response_length(resp: &axum::response::Response) -> String {
    if let Some(value) = resp
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
    {
        return value.to_string();
    }
    match resp.body().size_hint().exact() {
        Some(len) => len.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    /// Inner service that echoes the request body back.
    #[derive(Clone)]
    struct EchoService;

    impl Service<Request<Body>> for EchoService {
        type Response = axum::response::Response;
        type Error = Infallible;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Body>) -> Self::Future {
            Box::pin(async move {
                let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
                    .await
                    .unwrap();
                Ok((StatusCode::OK, bytes).into_response())
            })
        }
    }

    #[test]
    fn test_body_for_log() {
        assert_eq!(body_for_log(&Bytes::new()), "{}");
        assert_eq!(
            body_for_log(&Bytes::from_static(br#"{ "name" : "Ada" }"#)),
            r#"{"name":"Ada"}"#
        );
        assert_eq!(body_for_log(&Bytes::from_static(b"plain")), "plain");
    }

    #[test]
    fn test_response_length_uses_body_size() {
        let resp = (StatusCode::OK, "hello").into_response();
        assert_eq!(response_length(&resp), "5");
    }

    #[test]
    fn test_log_line_format() {
        let body = Bytes::from_static(br#"{ "name": "Ada Lovelace", "number": "39-44-5323523" }"#);
        let resp = (StatusCode::OK, r#"{"id":"5"}"#).into_response();

        let line = log_line(
            &Method::POST,
            &"/api/persons".parse::<Uri>().unwrap(),
            resp.status(),
            &response_length(&resp),
            0.4121,
            &body_for_log(&body),
        );
        assert_eq!(
            line,
            r#"POST /api/persons 200 10 - 0.412 ms {"name":"Ada Lovelace","number":"39-44-5323523"}"#
        );
    }

    #[test]
    fn test_log_line_without_body() {
        let resp = StatusCode::NO_CONTENT.into_response();
        let line = log_line(
            &Method::DELETE,
            &"/api/persons/1".parse::<Uri>().unwrap(),
            resp.status(),
            &response_length(&resp),
            1.0,
            &body_for_log(&Bytes::new()),
        );
        assert_eq!(line, "DELETE /api/persons/1 204 0 - 1.000 ms {}");
    }

    #[tokio::test]
    async fn test_body_reaches_inner_service_unchanged() {
        let service = RequestLogLayer::new().layer(EchoService);
        let payload = r#"{"name":"Ada Lovelace","number":"39-44-5323523"}"#;

        let req = Request::builder()
            .method("POST")
            .uri("/api/persons")
            .body(Body::from(payload))
            .unwrap();
        let resp = service.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes, payload.as_bytes());
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let service = RequestLogLayer::new().layer(EchoService);
        let req = Request::builder()
            .method("POST")
            .uri("/api/persons")
            .body(Body::from(vec![b'x'; MAX_BODY_BYTES + 1]))
            .unwrap();
        let resp = service.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
