use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Highest page number a caller may request.
pub const MAX_PAGE: i64 = 10_000_000;

/// Upper bound on rows returned per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort keys accepted by the public listing endpoint.
pub const DEFAULT_SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        use SortField::*;
        &[Id, Title, Year, Runtime]
    }

    /// Column name as written in the `games` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Year => "year",
            SortField::Runtime => "runtime",
        }
    }
}

impl FromStr for SortField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::all()
            .iter()
            .copied()
            .find(|field| field.column() == s)
            .ok_or_else(|| ModelError::InvalidSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A resolved ordering: one known column plus a direction.
///
/// This is the only shape in which a caller's sort request reaches query
/// construction, so every fragment it renders is a static string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::ascending(SortField::Id)
    }
}

impl FromStr for SortKey {
    type Err = ModelError;

    /// A leading `-` selects descending order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('-') {
            Some(column) => column.parse().map(SortKey::descending),
            None => s.parse().map(SortKey::ascending),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction == SortDirection::Descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.column())
    }
}

/// Paging and ordering requested for a listing.
///
/// The safelist travels with the request so each caller decides which keys
/// are legal; nothing outside it may resolve to a [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            sort: "id".to_string(),
            sort_safelist: DEFAULT_SORT_SAFELIST
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

impl Filters {
    pub fn new(page: i64, page_size: i64, sort: impl Into<String>) -> Self {
        Self {
            page,
            page_size,
            sort: sort.into(),
            ..Self::default()
        }
    }

    pub fn with_safelist<I, S>(mut self, safelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_safelist = safelist.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_sort_permitted(&self) -> bool {
        self.sort_safelist.iter().any(|key| key == &self.sort)
    }

    /// Resolves the requested sort against the safelist.
    ///
    /// Returns `None` when the key is not safelisted or does not name a known
    /// column.
    pub fn sort_key(&self) -> Option<SortKey> {
        if !self.is_sort_permitted() {
            return None;
        }
        self.sort.parse().ok()
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_direction_prefix() {
        assert_eq!(
            "-year".parse::<SortKey>(),
            Ok(SortKey::descending(SortField::Year))
        );
        assert_eq!(
            "title".parse::<SortKey>(),
            Ok(SortKey::ascending(SortField::Title))
        );
        assert!("--year".parse::<SortKey>().is_err());
        assert!("year; DROP TABLE games".parse::<SortKey>().is_err());
        assert_eq!(SortKey::descending(SortField::Runtime).to_string(), "-runtime");
    }

    #[test]
    fn sort_key_requires_safelist_membership() {
        let filters = Filters::new(1, 20, "-runtime");
        assert_eq!(
            filters.sort_key(),
            Some(SortKey::descending(SortField::Runtime))
        );

        let narrowed = Filters::new(1, 20, "-runtime").with_safelist(["id"]);
        assert_eq!(narrowed.sort_key(), None);
    }

    #[test]
    fn safelisted_but_unknown_key_does_not_resolve() {
        let filters =
            Filters::new(1, 20, "price").with_safelist(["id", "price"]);
        assert!(filters.is_sort_permitted());
        assert_eq!(filters.sort_key(), None);
    }

    #[test]
    fn limit_and_offset_follow_page() {
        let filters = Filters::new(3, 25, "id");
        assert_eq!(filters.limit(), 25);
        assert_eq!(filters.offset(), 50);
        assert_eq!(Filters::default().offset(), 0);
    }
}
