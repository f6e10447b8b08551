//! `bike-dash` library crate.
//!
//! Holds the data pipeline behind the dashboard: loading the daily rental
//! table, filtering it by date and projecting it into chart-ready views.
//! The egui front-end (`src/main.rs`) only calls into these modules.

pub mod config;
pub mod data;
pub mod error;

pub use data::filter::{DateRange, filter_by_date_range};
pub use data::loader::{DataSource, Loader, load_file};
pub use data::model::{DayType, RentalRecord, RentalTable};
pub use data::query::{
    ChartView, DashboardView, DayTypeAggregate, DerivedView, Factor, FactorProjection,
    SummaryStats, aggregate_by_day_type, evaluate, project_factor, project_factor_named,
    summarize,
};
pub use error::{ConfigError, InvalidFactorError, LoadError};
