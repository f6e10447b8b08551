/// Data layer: core types, loading, filtering and derived views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (path or URL)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → RentalTable (day type derived here)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RentalTable │  immutable Vec<RentalRecord>, shared via Arc
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  DateRange → borrowed subset, source order kept
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  day-type sums | factor pairs, plus summary stats
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
