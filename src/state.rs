use std::sync::Arc;

use bike_dash::{
    ChartView, DashboardView, DataSource, DateRange, Factor, Loader, RentalTable, evaluate,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which of the two charts the sidebar radio selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    DayType,
    Factor,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Last source a load was attempted from; File → Reload uses it.
    pub source: Option<DataSource>,

    /// Loaded base table (None until a source is loaded).
    pub table: Option<Arc<RentalTable>>,

    /// Current date filter; defaults to the table's date bounds.
    pub range: Option<DateRange>,

    pub chart: ChartKind,

    /// Factor for the scatter chart, remembered while the bar chart is shown.
    pub factor: Factor,

    /// Derived view for the current selection (recomputed on change).
    pub view: Option<DashboardView>,

    /// Text of the source box (path or URL) in the top bar.
    pub source_input: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub loader: Loader,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Loader::default())
    }
}

impl AppState {
    pub fn new(loader: Loader) -> Self {
        Self {
            source: None,
            table: None,
            range: None,
            chart: ChartKind::DayType,
            factor: Factor::Temperature,
            view: None,
            source_input: String::new(),
            status_message: None,
            loader,
        }
    }

    /// Load a dataset; failures leave an empty dashboard with a message.
    pub fn load(&mut self, source: &DataSource) {
        self.source = Some(source.clone());
        match self.loader.load(source) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {source}: {e:#}");
                self.table = None;
                self.range = None;
                self.view = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Publish a newly loaded table and reset the filter to its full span.
    pub fn set_table(&mut self, table: RentalTable) {
        if table.is_empty() {
            log::warn!("{} has no rows", table.origin());
        }
        self.range = DateRange::spanning(&table);
        self.table = Some(Arc::new(table));
        self.status_message = None;
        self.refresh();
    }

    pub fn chart_view(&self) -> ChartView {
        match self.chart {
            ChartKind::DayType => ChartView::DayType,
            ChartKind::Factor => ChartView::Factor(self.factor),
        }
    }

    /// Recompute the derived view after a filter or selection change.
    pub fn refresh(&mut self) {
        self.view = match (&self.table, self.range) {
            (Some(table), Some(range)) => {
                if range.is_inverted() {
                    log::warn!("start date {} is after end date {}", range.start, range.end);
                }
                Some(evaluate(table, range, self.chart_view()))
            }
            _ => None,
        };
    }

    pub fn set_range(&mut self, range: DateRange) {
        if self.range != Some(range) {
            self.range = Some(range);
            self.refresh();
        }
    }

    pub fn set_chart(&mut self, chart: ChartKind) {
        if self.chart != chart {
            self.chart = chart;
            self.refresh();
        }
    }

    pub fn set_factor(&mut self, factor: Factor) {
        if self.factor != factor {
            self.factor = factor;
            self.refresh();
        }
    }

    pub fn range_is_inverted(&self) -> bool {
        self.range.is_some_and(|r| r.is_inverted())
    }

    /// A source loaded successfully but held no rows.
    pub fn table_is_empty(&self) -> bool {
        self.table.as_ref().is_some_and(|t| t.is_empty())
    }
}
