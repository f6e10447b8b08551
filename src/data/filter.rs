use chrono::NaiveDate;

use super::model::{RentalRecord, RentalTable};

// ---------------------------------------------------------------------------
// DateRange – the user-controlled closed interval
// ---------------------------------------------------------------------------

/// Closed interval `[start, end]` of calendar days.
///
/// An inverted range (`start > end`) is allowed; it simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range covering the whole table, or `None` if it is empty.
    pub fn spanning(table: &RentalTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| Self::new(start, end))
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Inclusive at both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Records dated inside `range`, in input order.
///
/// An inverted range yields an empty vector.
pub fn filter_by_date_range<'a>(
    records: &'a [RentalRecord],
    range: &DateRange,
) -> Vec<&'a RentalRecord> {
    if range.is_inverted() {
        return Vec::new();
    }
    records.iter().filter(|r| range.contains(r.date())).collect()
}
