use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log method, path and status for every completed request.
///
/// Severity follows the response class: 5xx at `error`, 4xx at `warn`,
/// everything else at `info`.
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/countries", post(create_country))
///     .layer(axum::middleware::from_fn(trace_requests))
/// ```
pub async fn trace_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::error!(%method, path = %path, status, "request completed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, path = %path, status, "request completed");
    } else {
        tracing::info!(%method, path = %path, status, "request completed");
    }
    response
}
