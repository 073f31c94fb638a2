use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use interactions::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use interactions::{Interaction, verify_request};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::app::AppContext;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/interactions", post(interactions))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}

pub async fn interactions(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let (Some(sig), Some(ts)) = (header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER)) else {
        debug!("interaction without signature headers");
        return (StatusCode::UNAUTHORIZED, "missing signature\n").into_response();
    };
    if let Err(e) = verify_request(&ctx.public_key, sig, ts, &body) {
        debug!(err = %e, "interaction signature rejected");
        return (StatusCode::UNAUTHORIZED, "invalid request signature\n").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(i) => i,
        Err(e) => {
            warn!(err = %e, "bad interaction json");
            return (StatusCode::BAD_REQUEST, "bad interaction\n").into_response();
        }
    };

    // Lookups read small local files; no need to leave the request task.
    match ctx.handle(&interaction) {
        Some(resp) => Json(resp).into_response(),
        None => (StatusCode::BAD_REQUEST, "unsupported interaction type\n").into_response(),
    }
}
