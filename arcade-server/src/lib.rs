//! HTTP surface of the Arcade game catalog.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{errors::AppError, handlers::params::EXPECTED_VERSION_HEADER};

pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(routes::create_api_router())
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = build_cors_layer(&state.config.cors_allowed_origins)
    {
        app = app.layer(cors_layer);
    }

    app.with_state(state)
}

/// Allow-list CORS; `None` when no origins are configured.
fn build_cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(EXPECTED_VERSION_HEADER),
            ]),
    )
}

async fn not_found_handler() -> AppError {
    AppError::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_needs_valid_origins() {
        assert!(build_cors_layer(&[]).is_none());
        assert!(build_cors_layer(&["bad\norigin".to_string()]).is_none());
        assert!(
            build_cors_layer(&["https://arcade.example".to_string()]).is_some()
        );
    }
}
