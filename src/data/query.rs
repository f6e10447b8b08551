//! Derived views over a filtered set of records.
//!
//! Everything here is a pure function of its inputs: the same records always
//! produce the same aggregate, projection and summary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::filter::{DateRange, filter_by_date_range};
use super::model::{DayType, RentalRecord, RentalTable};
use crate::error::InvalidFactorError;

// ---------------------------------------------------------------------------
// Day-type aggregate
// ---------------------------------------------------------------------------

/// Summed rentals per day type present in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTypeAggregate {
    totals: BTreeMap<DayType, u64>,
}

impl DayTypeAggregate {
    pub fn get(&self, day_type: DayType) -> Option<u64> {
        self.totals.get(&day_type).copied()
    }

    /// Entries in canonical order (Holiday, Weekday, Weekend), absent ones skipped.
    pub fn iter(&self) -> impl Iterator<Item = (DayType, u64)> + '_ {
        self.totals.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Totals saturate at `u64::MAX` rather than wrapping.
pub fn aggregate_by_day_type(records: &[&RentalRecord]) -> DayTypeAggregate {
    let mut totals = BTreeMap::new();
    for r in records {
        let total: &mut u64 = totals.entry(r.day_type()).or_insert(0);
        *total = total.saturating_add(r.rental_count());
    }
    DayTypeAggregate { totals }
}

// ---------------------------------------------------------------------------
// Factor projection
// ---------------------------------------------------------------------------

/// Weather covariate selectable for the scatter view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Temperature,
    Humidity,
    Windspeed,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::Temperature, Factor::Humidity, Factor::Windspeed];

    pub fn value_of(self, record: &RentalRecord) -> f64 {
        match self {
            Factor::Temperature => record.temperature(),
            Factor::Humidity => record.humidity(),
            Factor::Windspeed => record.windspeed(),
        }
    }

    /// Column name in the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            Factor::Temperature => "temp",
            Factor::Humidity => "hum",
            Factor::Windspeed => "windspeed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Factor::Temperature => "Temperature",
            Factor::Humidity => "Humidity",
            Factor::Windspeed => "Wind speed",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Factor {
    type Err = InvalidFactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temp" | "temperature" => Ok(Factor::Temperature),
            "hum" | "humidity" => Ok(Factor::Humidity),
            "windspeed" | "wind_speed" | "wind speed" => Ok(Factor::Windspeed),
            _ => Err(InvalidFactorError(s.to_string())),
        }
    }
}

/// `(factor value, rental count)` pairs in record order.
pub type FactorProjection = Vec<(f64, u64)>;

pub fn project_factor(records: &[&RentalRecord], factor: Factor) -> FactorProjection {
    records
        .iter()
        .map(|r| (factor.value_of(r), r.rental_count()))
        .collect()
}

/// Like [`project_factor`] but selects the factor by name.
///
/// The name is validated before any record is touched.
pub fn project_factor_named(
    records: &[&RentalRecord],
    factor: &str,
) -> Result<FactorProjection, InvalidFactorError> {
    let factor = factor.parse::<Factor>()?;
    Ok(project_factor(records, factor))
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_rentals: u64,
    /// `None` when there is nothing in range.
    pub busiest_day: Option<RentalRecord>,
}

/// Total rentals (saturating) plus the first record holding the maximum count.
pub fn summarize(records: &[&RentalRecord]) -> SummaryStats {
    let total_rentals = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.rental_count()));

    let mut busiest: Option<&RentalRecord> = None;
    for &r in records {
        match busiest {
            Some(best) if r.rental_count() <= best.rental_count() => {}
            _ => busiest = Some(r),
        }
    }

    SummaryStats {
        total_rentals,
        busiest_day: busiest.cloned(),
    }
}

// ---------------------------------------------------------------------------
// One interaction's worth of output
// ---------------------------------------------------------------------------

/// Which chart the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    DayType,
    Factor(Factor),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DerivedView {
    DayType(DayTypeAggregate),
    Factor {
        factor: Factor,
        points: FactorProjection,
    },
}

/// Derived view and summary for the current filter and chart selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub range: DateRange,
    pub rows_in_range: usize,
    pub view: DerivedView,
    pub summary: SummaryStats,
}

/// Filter once, then compute the selected view and the summary.
pub fn evaluate(table: &RentalTable, range: DateRange, chart: ChartView) -> DashboardView {
    let filtered = filter_by_date_range(table.records(), &range);
    log::debug!(
        "recomputing {chart:?} for {} to {}: {} of {} rows",
        range.start,
        range.end,
        filtered.len(),
        table.len()
    );

    let view = match chart {
        ChartView::DayType => DerivedView::DayType(aggregate_by_day_type(&filtered)),
        ChartView::Factor(factor) => DerivedView::Factor {
            factor,
            points: project_factor(&filtered, factor),
        },
    };

    DashboardView {
        range,
        rows_in_range: filtered.len(),
        view,
        summary: summarize(&filtered),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekday(d: u32, cnt: u64) -> RentalRecord {
        RentalRecord::new(date(2011, 3, d), false, true, 0.1 * d as f64, 0.5, 0.2, cnt)
    }

    fn sample() -> Vec<RentalRecord> {
        vec![
            RentalRecord::new(date(2011, 1, 1), false, false, 0.34, 0.80, 0.16, 985),
            RentalRecord::new(date(2011, 1, 3), false, true, 0.19, 0.43, 0.24, 1349),
            RentalRecord::new(date(2011, 1, 17), true, false, 0.17, 0.48, 0.30, 1000),
            RentalRecord::new(date(2011, 1, 4), false, true, 0.20, 0.59, 0.16, 1562),
            RentalRecord::new(date(2011, 1, 2), false, false, 0.36, 0.69, 0.25, 801),
        ]
    }

    #[test]
    fn weekday_sums_only() {
        let records = vec![weekday(1, 10), weekday(2, 20), weekday(3, 30)];
        let refs: Vec<&RentalRecord> = records.iter().collect();
        let agg = aggregate_by_day_type(&refs);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.get(DayType::Weekday), Some(60));
        assert_eq!(agg.get(DayType::Holiday), None);
        assert_eq!(agg.get(DayType::Weekend), None);
    }

    #[test]
    fn aggregate_is_in_canonical_order() {
        let records = sample();
        let refs: Vec<&RentalRecord> = records.iter().collect();
        let agg = aggregate_by_day_type(&refs);
        let entries: Vec<(DayType, u64)> = agg.iter().collect();
        assert_eq!(
            entries,
            vec![
                (DayType::Holiday, 1000),
                (DayType::Weekday, 1349 + 1562),
                (DayType::Weekend, 985 + 801),
            ]
        );
    }

    #[test]
    fn empty_aggregate() {
        assert!(aggregate_by_day_type(&[]).is_empty());
    }

    #[test]
    fn projection_matches_records() {
        let records = sample();
        let refs: Vec<&RentalRecord> = records.iter().collect();
        let points = project_factor(&refs, Factor::Temperature);
        assert_eq!(points.len(), records.len());
        for (r, (x, y)) in records.iter().zip(&points) {
            assert_eq!(*x, r.temperature());
            assert_eq!(*y, r.rental_count());
        }

        let hum = project_factor(&refs, Factor::Humidity);
        assert_eq!(hum[0], (0.80, 985));
        let wind = project_factor(&refs, Factor::Windspeed);
        assert_eq!(wind[2], (0.30, 1000));
    }

    #[test]
    fn factor_names_parse() {
        assert_eq!("temp".parse::<Factor>(), Ok(Factor::Temperature));
        assert_eq!("Humidity".parse::<Factor>(), Ok(Factor::Humidity));
        assert_eq!("wind_speed".parse::<Factor>(), Ok(Factor::Windspeed));
        for f in Factor::ALL {
            assert_eq!(f.column().parse::<Factor>(), Ok(f));
        }
    }

    #[test]
    fn unknown_factor_fails_fast() {
        let records = sample();
        let refs: Vec<&RentalRecord> = records.iter().collect();
        let err = project_factor_named(&refs, "pressure").unwrap_err();
        assert_eq!(err, InvalidFactorError("pressure".to_string()));
        assert!(project_factor_named(&refs, "").is_err());
        assert_eq!(project_factor_named(&refs, "hum").unwrap().len(), 5);
    }

    #[test]
    fn empty_summary_uses_sentinel() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_rentals, 0);
        assert_eq!(summary.busiest_day, None);
    }

    #[test]
    fn busiest_day_tie_takes_first() {
        let records = vec![weekday(1, 5), weekday(2, 40), weekday(3, 12), weekday(4, 40)];
        let refs: Vec<&RentalRecord> = records.iter().collect();
        let summary = summarize(&refs);
        assert_eq!(summary.total_rentals, 97);
        assert_eq!(summary.busiest_day.unwrap().date(), date(2011, 3, 2));
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let records = vec![
            weekday(1, i64::MAX as u64),
            weekday(2, i64::MAX as u64),
            weekday(3, i64::MAX as u64),
        ];
        let refs: Vec<&RentalRecord> = records.iter().collect();

        let agg = aggregate_by_day_type(&refs);
        assert_eq!(agg.get(DayType::Weekday), Some(u64::MAX));

        let summary = summarize(&refs);
        assert_eq!(summary.total_rentals, u64::MAX);
        assert_eq!(summary.busiest_day.unwrap().date(), date(2011, 3, 1));
    }

    #[test]
    fn evaluate_switches_views() {
        let table = RentalTable::new(sample(), "memory");
        let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 4));

        let bars = evaluate(&table, range, ChartView::DayType);
        assert_eq!(bars.rows_in_range, 4);
        assert_eq!(bars.summary.total_rentals, 985 + 1349 + 1562 + 801);
        assert_eq!(bars.summary.busiest_day.unwrap().rental_count(), 1562);
        match bars.view {
            DerivedView::DayType(agg) => assert_eq!(agg.get(DayType::Holiday), None),
            other => panic!("unexpected view {other:?}"),
        }

        let scatter = evaluate(&table, range, ChartView::Factor(Factor::Windspeed));
        match scatter.view {
            DerivedView::Factor { factor, points } => {
                assert_eq!(factor, Factor::Windspeed);
                assert_eq!(points, vec![(0.16, 985), (0.24, 1349), (0.16, 1562), (0.25, 801)]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn evaluate_with_inverted_range() {
        let table = RentalTable::new(sample(), "memory");
        let range = DateRange::new(date(2012, 1, 1), date(2011, 1, 1));
        let out = evaluate(&table, range, ChartView::DayType);
        assert_eq!(out.rows_in_range, 0);
        assert_eq!(out.view, DerivedView::DayType(DayTypeAggregate::default()));
        assert_eq!(out.summary.busiest_day, None);
    }
}
