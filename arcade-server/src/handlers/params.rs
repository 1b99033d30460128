//! Helpers for pulling typed values out of paths, query strings and headers.

use std::collections::HashMap;

use arcade_core::{GameId, Validator};
use axum::http::HeaderMap;

use crate::{errors::AppError, infra::config::split_csv};

pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Parses a `{id}` path segment; anything but a positive integer is a 404.
pub fn read_id_param(raw: &str) -> Result<GameId, AppError> {
    match raw.parse::<GameId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::not_found()),
    }
}

pub fn read_string(
    qs: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> String {
    qs.get(key)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

pub fn read_csv(qs: &HashMap<String, String>, key: &str) -> Vec<String> {
    qs.get(key).map(|raw| split_csv(raw)).unwrap_or_default()
}

/// Reads an integer, recording a field error instead of failing outright.
pub fn read_int(
    qs: &HashMap<String, String>,
    key: &str,
    default: i64,
    v: &mut Validator,
) -> i64 {
    match qs.get(key).filter(|value| !value.is_empty()) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            v.add_error(key, "must be an integer value");
            default
        }),
    }
}

/// The version a client last saw, if it sent one.
///
/// A blank header carries no precondition. A header that is present but not
/// a base-10 integer is an edit conflict, the same as a mismatched version.
pub fn read_expected_version(
    headers: &HeaderMap,
) -> Result<Option<i32>, AppError> {
    let Some(value) = headers.get(EXPECTED_VERSION_HEADER) else {
        return Ok(None);
    };

    let raw = value.to_str().map_err(|_| AppError::edit_conflict())?.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| AppError::edit_conflict())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn qs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn id_param_must_be_positive_integer() {
        assert_eq!(read_id_param("42").unwrap(), 42);
        for raw in ["0", "-3", "abc", "4.2", ""] {
            assert_eq!(
                read_id_param(raw).unwrap_err().status,
                axum::http::StatusCode::NOT_FOUND
            );
        }
    }

    #[test]
    fn query_defaults_apply_when_missing_or_blank() {
        let params = qs(&[("title", ""), ("genres", "rpg, indie")]);
        assert_eq!(read_string(&params, "title", ""), "");
        assert_eq!(read_string(&params, "sort", "id"), "id");
        assert_eq!(read_csv(&params, "genres"), vec!["rpg", "indie"]);
        assert!(read_csv(&params, "missing").is_empty());
    }

    #[test]
    fn bad_integers_become_field_errors() {
        let params = qs(&[("page", "two"), ("page_size", "5")]);
        let mut v = Validator::new();
        assert_eq!(read_int(&params, "page", 1, &mut v), 1);
        assert_eq!(read_int(&params, "page_size", 20, &mut v), 5);
        assert_eq!(
            v.errors().get("page"),
            Some("must be an integer value")
        );
        assert!(v.errors().get("page_size").is_none());
    }

    #[test]
    fn expected_version_is_decimal() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_expected_version(&headers).unwrap(), None);

        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static(""));
        assert_eq!(read_expected_version(&headers).unwrap(), None);
        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static("  "));
        assert_eq!(read_expected_version(&headers).unwrap(), None);

        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static("12"));
        assert_eq!(read_expected_version(&headers).unwrap(), Some(12));

        // "c" is twelve in base 32; it must not be accepted.
        headers.insert(EXPECTED_VERSION_HEADER, HeaderValue::from_static("c"));
        assert_eq!(
            read_expected_version(&headers).unwrap_err().status,
            axum::http::StatusCode::CONFLICT
        );
    }
}
