use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// DayType – derived classification of a calendar day
// ---------------------------------------------------------------------------

/// Holiday, Weekday or Weekend.
///
/// Declaration order is the canonical display order, so anything keyed by
/// `DayType` in a `BTreeMap` iterates Holiday → Weekday → Weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayType {
    Holiday,
    Weekday,
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Holiday, DayType::Weekday, DayType::Weekend];

    /// Holiday wins over the working-day flag.
    pub fn classify(is_holiday: bool, is_working_day: bool) -> Self {
        if is_holiday {
            DayType::Holiday
        } else if is_working_day {
            DayType::Weekday
        } else {
            DayType::Weekend
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Holiday => "Holiday",
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RentalRecord – one row of the base table
// ---------------------------------------------------------------------------

/// A single day of rentals.
///
/// Fields are private so `day_type` always matches the two flags it is
/// derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
    date: NaiveDate,
    is_holiday: bool,
    is_working_day: bool,
    temperature: f64,
    humidity: f64,
    windspeed: f64,
    rental_count: u64,
    day_type: DayType,
}

impl RentalRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        is_holiday: bool,
        is_working_day: bool,
        temperature: f64,
        humidity: f64,
        windspeed: f64,
        rental_count: u64,
    ) -> Self {
        Self {
            date,
            is_holiday,
            is_working_day,
            temperature,
            humidity,
            windspeed,
            rental_count,
            day_type: DayType::classify(is_holiday, is_working_day),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_holiday(&self) -> bool {
        self.is_holiday
    }

    pub fn is_working_day(&self) -> bool {
        self.is_working_day
    }

    /// Normalized temperature as published in the source.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Normalized relative humidity.
    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Normalized wind speed.
    pub fn windspeed(&self) -> f64 {
        self.windspeed
    }

    pub fn rental_count(&self) -> u64 {
        self.rental_count
    }

    pub fn day_type(&self) -> DayType {
        self.day_type
    }
}

// ---------------------------------------------------------------------------
// RentalTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The base table: every record in source order.
#[derive(Debug, Clone)]
pub struct RentalTable {
    records: Vec<RentalRecord>,
    /// Where the table came from (path or URL), for display.
    origin: String,
}

impl RentalTable {
    pub fn new(records: Vec<RentalRecord>, origin: impl Into<String>) -> Self {
        Self {
            records,
            origin: origin.into(),
        }
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}
