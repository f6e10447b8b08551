use bike_dash::{DayTypeAggregate, DerivedView, Factor};
use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::{day_type_color, regression_color, scatter_color};
use crate::state::AppState;
use crate::ui::format::format_count;
use crate::ui::regression::fit_line;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render whichever chart the current view holds.
pub fn central_plot(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.view else {
        let message = if state.table_is_empty() {
            "The loaded dataset has no rows"
        } else {
            "Open a dataset to explore rentals  (File → Open…)"
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };

    match &dashboard.view {
        DerivedView::DayType(aggregate) => day_type_chart(ui, aggregate),
        DerivedView::Factor { factor, points } => factor_chart(ui, *factor, points),
    }
}

// ---------------------------------------------------------------------------
// Bar chart: total rentals per day type
// ---------------------------------------------------------------------------

fn day_type_chart(ui: &mut Ui, aggregate: &DayTypeAggregate) {
    ui.heading("Total bike rentals by day type");

    let names: Vec<&'static str> = aggregate.iter().map(|(dt, _)| dt.as_str()).collect();
    let max = aggregate.iter().map(|(_, v)| v).max().unwrap_or(0) as f64;

    Plot::new("day_type_plot")
        .legend(Legend::default())
        .y_axis_label("Total bike rentals")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).map(|s| s.to_string()).unwrap_or_default()
        })
        .include_y(0.0)
        .include_y(max * 1.1)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (day_type, total)) in aggregate.iter().enumerate() {
                let x = i as f64;
                let color = day_type_color(day_type);
                let bar = Bar::new(x, total as f64)
                    .name(day_type.as_str())
                    .fill(color)
                    .width(0.6);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(day_type.as_str()).color(color));

                let label = Text::new(
                    PlotPoint::new(x, total as f64 + max * 0.02),
                    RichText::new(format_count(total)).strong(),
                )
                .anchor(Align2::CENTER_BOTTOM);
                plot_ui.text(label);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter + regression: one weather factor against rentals
// ---------------------------------------------------------------------------

fn factor_chart(ui: &mut Ui, factor: Factor, points: &[(f64, u64)]) {
    ui.heading(format!("{factor} vs bike rentals"));

    let scatter: PlotPoints = points.iter().map(|&(x, y)| [x, y as f64]).collect();
    let fit = fit_line(points);
    let x_span = points.iter().fold(None, |acc: Option<(f64, f64)>, &(x, _)| {
        Some(acc.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))))
    });

    Plot::new("factor_plot")
        .legend(Legend::default())
        .x_axis_label(factor.label())
        .y_axis_label("Bike rentals")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(scatter)
                    .name("Days")
                    .color(scatter_color())
                    .radius(2.5),
            );

            if let (Some(fit), Some((lo, hi))) = (fit, x_span) {
                let line = PlotPoints::new(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]);
                plot_ui.line(
                    Line::new(line)
                        .name(format!("Linear fit (slope {:.0})", fit.slope))
                        .color(regression_color())
                        .width(2.0),
                );
            }
        });
}
