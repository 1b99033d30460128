use axum::{Router, routing::get};

use crate::{
    AppState,
    errors::AppError,
    handlers::{
        games::{
            create_game_handler, delete_game_handler, list_games_handler,
            show_game_handler, update_game_handler,
        },
        healthcheck::healthcheck_handler,
    },
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route(
            "/games",
            get(list_games_handler).post(create_game_handler),
        )
        .route(
            "/games/{id}",
            get(show_game_handler)
                .patch(update_game_handler)
                .delete(delete_game_handler),
        )
        .method_not_allowed_fallback(method_not_allowed_handler)
}

async fn method_not_allowed_handler() -> AppError {
    AppError::method_not_allowed()
}
