use axum::{
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Response},
};

use crate::proxy::{resolve_request, ProxyParams};
use crate::AppState;

/// Undecodable query strings fall back to no parameters and fail validation.
pub async fn handler(
    State(state): State<AppState>,
    method: Method,
    params: Option<Query<ProxyParams>>,
) -> Response {
    let params = params.map(|Query(params)| params).unwrap_or_default();

    resolve_request(
        state.api.as_ref(),
        &state.base_url,
        &method,
        &params,
        state.api_key.as_ref(),
    )
    .await
    .into_response()
}
