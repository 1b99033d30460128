/// Page-count summary returned alongside a listing.
///
/// All fields are zero when the listing matched nothing; that means "no
/// pages", not "page 1 of 1".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

pub fn calculate_metadata(total: i64, page: i64, page_size: i64) -> Metadata {
    if total <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        last_page: (total + page_size - 1) / page_size,
        total_records: total,
    }
}
