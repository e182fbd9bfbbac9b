use axum::{
    http::{header::ALLOW, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::middleware::require_session;
use crate::envelope::Envelope;
use crate::state::AppState;
use crate::{auth, notes};

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::session_router())
        .merge(notes::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(auth::public_router())
        .merge(protected)
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

async fn route_not_found() -> Envelope<()> {
    Envelope::failure(StatusCode::NOT_FOUND, "Not Found")
}

/// The router answers a known path with the wrong method by itself, with an
/// empty body. Re-render it as an envelope, keeping the `Allow` header.
async fn method_not_allowed(res: Response) -> Response {
    if res.status() != StatusCode::METHOD_NOT_ALLOWED {
        return res;
    }
    let allow = res.headers().get(ALLOW).cloned();
    let mut out =
        Envelope::failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    if let Some(allow) = allow {
        out.headers_mut().insert(ALLOW, allow);
    }
    out
}
