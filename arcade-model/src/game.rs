use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ModelError;

/// Storage-assigned primary key of a catalog record.
pub type GameId = i64;

/// Running time in whole minutes.
///
/// On the wire a runtime is the string `"<n> mins"` rather than a bare
/// integer; the `serde` feature enables that representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn minutes(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Runtime(minutes)
    }
}

impl FromStr for Runtime {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidRuntime(s.to_string());

        let (minutes, unit) = s.trim().split_once(' ').ok_or_else(invalid)?;
        if unit != "mins" {
            return Err(invalid());
        }

        minutes.parse::<i32>().map(Runtime).map_err(|_| invalid())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Runtime {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Runtime {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single catalog record.
///
/// `id`, `created_at` and `version` are owned by storage: they are ignored on
/// insert and populated from the `RETURNING` clause afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    pub id: GameId,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: f64,
    pub version: i32,
}

impl Game {
    /// Builds an unsaved record carrying only caller-owned fields.
    pub fn new(
        title: impl Into<String>,
        year: i32,
        runtime: Runtime,
        genres: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            runtime,
            genres,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, lines: Vec<String>) -> Self {
        self.description = lines;
        self
    }

    pub fn with_pricing(mut self, size: f64, price: f64) -> Self {
        self.size = size;
        self.price = price;
        self
    }

    /// True once storage has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_parses_minutes_suffix() {
        assert_eq!("102 mins".parse::<Runtime>(), Ok(Runtime(102)));
        assert_eq!(Runtime(95).to_string(), "95 mins");
    }

    #[test]
    fn runtime_rejects_other_shapes() {
        for raw in ["102", "102 minutes", "mins", "abc mins", ""] {
            assert!(
                raw.parse::<Runtime>().is_err(),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn new_game_is_unsaved() {
        let game = Game::new("Doom", 1993, Runtime(30), vec!["fps".into()]);
        assert!(!game.is_persisted());
        assert_eq!(game.version, 0);
        assert!(game.description.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn runtime_serializes_as_string() {
        let game = Game::new("Myst", 1993, Runtime(120), vec!["puzzle".into()]);
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["runtime"], "120 mins");
        assert!(json.get("created_at").is_none());

        let back: Runtime = serde_json::from_str("\"45 mins\"").unwrap();
        assert_eq!(back, Runtime(45));
        assert!(serde_json::from_str::<Runtime>("45").is_err());
    }
}
