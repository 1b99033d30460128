//! Field-level validation for catalog records and listing filters.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::Hash;

use arcade_model::{Filters, Game, MAX_PAGE, MAX_PAGE_SIZE};
use chrono::{Datelike, Utc};
use serde::Serialize;

pub const MAX_TITLE_BYTES: usize = 500;
pub const MIN_YEAR: i32 = 1888;
pub const MAX_GENRES: usize = 5;

/// Field name to message, one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn single(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.0.insert(key.into(), message.into());
        errors
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Collects field errors; the first message recorded for a key wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, key: &str, message: &str) {
        self.errors
            .0
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn check(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_error(key, message);
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

pub fn validate_game(v: &mut Validator, game: &Game) {
    let current_year = Utc::now().year();

    v.check(!game.title.is_empty(), "title", "must be provided");
    v.check(
        game.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    v.check(game.year != 0, "year", "must be provided");
    v.check(game.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(game.year <= current_year, "year", "must not be in the future");

    v.check(game.runtime.minutes() != 0, "runtime", "must be provided");
    v.check(
        game.runtime.minutes() > 0,
        "runtime",
        "must be a positive integer",
    );

    v.check(!game.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        game.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        unique(&game.genres),
        "genres",
        "must not contain duplicate values",
    );

    v.check(game.size >= 0.0, "size", "must not be negative");
    v.check(game.price >= 0.0, "price", "must not be negative");
}

pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page > 0, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );

    v.check(
        permitted_value(&filters.sort, &filters.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_model::Runtime;

    fn valid_game() -> Game {
        Game::new(
            "Half-Life",
            1998,
            Runtime(720),
            vec!["fps".into(), "sci-fi".into()],
        )
    }

    fn errors_for(game: &Game) -> ValidationErrors {
        let mut v = Validator::new();
        validate_game(&mut v, game);
        v.into_result().unwrap_err()
    }

    #[test]
    fn valid_game_passes() {
        let mut v = Validator::new();
        validate_game(&mut v, &valid_game());
        assert!(v.is_valid(), "{}", v.errors());
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut game = valid_game();
        game.year = 0;
        let errors = errors_for(&game);
        assert_eq!(errors.get("year"), Some("must be provided"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn title_rules() {
        let mut game = valid_game();
        game.title.clear();
        assert_eq!(errors_for(&game).get("title"), Some("must be provided"));

        game.title = "x".repeat(MAX_TITLE_BYTES + 1);
        assert_eq!(
            errors_for(&game).get("title"),
            Some("must not be more than 500 bytes long")
        );
    }

    #[test]
    fn year_bounds() {
        let mut game = valid_game();
        game.year = 1887;
        assert_eq!(
            errors_for(&game).get("year"),
            Some("must be greater than 1888")
        );

        game.year = Utc::now().year() + 1;
        assert_eq!(
            errors_for(&game).get("year"),
            Some("must not be in the future")
        );
    }

    #[test]
    fn runtime_must_be_positive() {
        let mut game = valid_game();
        game.runtime = Runtime(-5);
        assert_eq!(
            errors_for(&game).get("runtime"),
            Some("must be a positive integer")
        );
    }

    #[test]
    fn genre_rules() {
        let mut game = valid_game();
        game.genres.clear();
        assert_eq!(
            errors_for(&game).get("genres"),
            Some("must contain at least 1 genre")
        );

        game.genres = (0..6).map(|i| format!("g{i}")).collect();
        assert_eq!(
            errors_for(&game).get("genres"),
            Some("must not contain more than 5 genres")
        );

        game.genres = vec!["rpg".into(), "rpg".into()];
        assert_eq!(
            errors_for(&game).get("genres"),
            Some("must not contain duplicate values")
        );
    }

    #[test]
    fn pricing_must_not_be_negative() {
        let game = valid_game().with_pricing(-1.0, -0.5);
        let errors = errors_for(&game);
        assert_eq!(errors.get("size"), Some("must not be negative"));
        assert_eq!(errors.get("price"), Some("must not be negative"));
    }

    #[test]
    fn filter_rules() {
        let mut v = Validator::new();
        validate_filters(&mut v, &Filters::new(0, 101, "rating"));
        let errors = v.into_result().unwrap_err();
        assert_eq!(errors.get("page"), Some("must be greater than zero"));
        assert_eq!(errors.get("page_size"), Some("must be a maximum of 100"));
        assert_eq!(errors.get("sort"), Some("invalid sort value"));

        let mut v = Validator::new();
        validate_filters(&mut v, &Filters::new(2, 50, "-title"));
        assert!(v.is_valid());
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut v = Validator::new();
        v.add_error("year", "must be provided");
        v.add_error("title", "must be provided");
        assert_eq!(
            v.errors().to_string(),
            "title: must be provided; year: must be provided"
        );
    }

    #[test]
    fn errors_serialize_as_flat_field_map() {
        let mut v = Validator::new();
        v.add_error("year", "must be provided");
        v.add_error("genres", "must contain at least 1 genre");

        assert_eq!(
            serde_json::to_value(v.errors()).unwrap(),
            serde_json::json!({
                "genres": "must contain at least 1 genre",
                "year": "must be provided"
            })
        );
    }
}
