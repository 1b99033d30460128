use std::collections::HashMap;

use arcade_core::{
    DEFAULT_SORT_SAFELIST, Filters, Game, Runtime, Validator,
    validation::{validate_filters, validate_game},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    AppState,
    errors::{AppError, AppResult},
    handlers::params::{
        read_csv, read_expected_version, read_id_param, read_int, read_string,
    },
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateGameRequest {
    #[serde(alias = "name")]
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub description: Vec<String>,
    pub size: f64,
    pub price: f64,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateGameRequest {
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
    pub description: Option<Vec<String>>,
    pub size: Option<f64>,
    pub price: Option<f64>,
}

impl UpdateGameRequest {
    fn apply(self, game: &mut Game) {
        if let Some(title) = self.title {
            game.title = title;
        }
        if let Some(year) = self.year {
            game.year = year;
        }
        if let Some(runtime) = self.runtime {
            game.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            game.genres = genres;
        }
        if let Some(description) = self.description {
            game.description = description;
        }
        if let Some(size) = self.size {
            game.size = size;
        }
        if let Some(price) = self.price {
            game.price = price;
        }
    }
}

fn ensure_valid_game(game: &Game) -> AppResult<()> {
    let mut v = Validator::new();
    validate_game(&mut v, game);
    v.into_result().map_err(AppError::failed_validation)
}

pub async fn list_games_handler(
    State(state): State<AppState>,
    Query(qs): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();

    let title = read_string(&qs, "title", "");
    let genres = read_csv(&qs, "genres");
    let filters = Filters {
        page: read_int(&qs, "page", 1, &mut v),
        page_size: read_int(&qs, "page_size", 20, &mut v),
        sort: read_string(&qs, "sort", "id"),
        sort_safelist: DEFAULT_SORT_SAFELIST
            .iter()
            .map(|key| key.to_string())
            .collect(),
    };

    validate_filters(&mut v, &filters);
    v.into_result().map_err(AppError::failed_validation)?;

    let (games, metadata) = state.games.list(&title, &genres, &filters).await?;
    debug!(
        count = games.len(),
        total = metadata.total_records,
        "listed games"
    );

    Ok(Json(json!({ "games": games, "metadata": metadata })))
}

pub async fn create_game_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;

    let mut game = Game::new(input.title, input.year, input.runtime, input.genres)
        .with_description(input.description)
        .with_pricing(input.size, input.price);
    ensure_valid_game(&game)?;

    state.games.insert(&mut game).await?;
    info!(game_id = game.id, "created game");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/v1/games/{}", game.id))],
        Json(json!({ "game": game })),
    ))
}

pub async fn show_game_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    let game = state.games.get(id).await?;

    Ok(Json(json!({ "game": game })))
}

pub async fn update_game_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<UpdateGameRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    let mut game = state.games.get(id).await?;

    if let Some(expected) = read_expected_version(&headers)?
        && expected != game.version
    {
        debug!(
            game_id = id,
            expected,
            stored = game.version,
            "expected version mismatch"
        );
        return Err(AppError::edit_conflict());
    }

    let Json(input) = payload?;
    input.apply(&mut game);
    ensure_valid_game(&game)?;

    state.games.update(&mut game).await?;
    info!(game_id = id, version = game.version, "updated game");

    Ok(Json(json!({ "game": game })))
}

pub async fn delete_game_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = read_id_param(&id)?;
    state.games.delete(id).await?;

    Ok(Json(json!({ "message": "game successfully deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_only_touches_present_fields() {
        let mut game = Game::new("Doom", 1993, Runtime(30), vec!["fps".into()])
            .with_pricing(2.0, 9.99);
        let request: UpdateGameRequest =
            serde_json::from_str(r#"{"title":"Doom II","runtime":"45 mins"}"#)
                .unwrap();

        request.apply(&mut game);
        assert_eq!(game.title, "Doom II");
        assert_eq!(game.runtime, Runtime(45));
        assert_eq!(game.year, 1993);
        assert_eq!(game.genres, vec!["fps".to_string()]);
        assert_eq!(game.price, 9.99);
    }

    #[test]
    fn create_request_accepts_name_alias_and_rejects_unknown_fields() {
        let request: CreateGameRequest = serde_json::from_str(
            r#"{"name":"Quake","year":1996,"runtime":"40 mins","genres":["fps"]}"#,
        )
        .unwrap();
        assert_eq!(request.title, "Quake");
        assert!(request.description.is_empty());

        assert!(
            serde_json::from_str::<CreateGameRequest>(r#"{"rating":5}"#)
                .is_err()
        );
    }
}
