use bike_dash::{DataSource, DateRange, Factor};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::{AppState, ChartKind};
use crate::ui::format::{busiest_day_line, format_count};

// ---------------------------------------------------------------------------
// Left side panel – filters, chart selection and summary
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Settings");
    ui.separator();

    if state.table_is_empty() {
        ui.label("The dataset has no rows.");
        return;
    }
    let Some(mut range) = state.range else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Date range ----
    ui.strong("Date range");
    egui::Grid::new("date_range")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Start");
            ui.add(DatePickerButton::new(&mut range.start).id_salt("start_date"));
            ui.end_row();

            ui.label("End");
            ui.add(DatePickerButton::new(&mut range.end).id_salt("end_date"));
            ui.end_row();
        });
    if ui.small_button("Full range").clicked() {
        if let Some(full) = state.table.as_deref().and_then(DateRange::spanning) {
            range = full;
        }
    }
    state.set_range(range);

    if state.range_is_inverted() {
        ui.label(
            RichText::new("⚠ Start date must not be after the end date!").color(Color32::RED),
        );
    }
    ui.separator();

    // ---- Chart selection ----
    ui.strong("Chart");
    let mut chart = state.chart;
    ui.radio_value(&mut chart, ChartKind::DayType, "Total rentals by day type");
    ui.radio_value(&mut chart, ChartKind::Factor, "Factors affecting rentals");
    state.set_chart(chart);

    if state.chart == ChartKind::Factor {
        let mut factor = state.factor;
        egui::ComboBox::from_id_salt("factor")
            .selected_text(factor.label())
            .show_ui(ui, |ui: &mut Ui| {
                for f in Factor::ALL {
                    ui.selectable_value(&mut factor, f, f.label());
                }
            });
        state.set_factor(factor);
    }
    ui.separator();

    // ---- Summary ----
    ui.heading("Summary");
    let Some(view) = &state.view else {
        return;
    };
    ui.label("Total bike rentals");
    ui.label(RichText::new(format_count(view.summary.total_rentals)).size(24.0).strong());
    ui.add_space(4.0);
    match busiest_day_line(&view.summary) {
        Some(line) => {
            ui.label("Busiest day");
            ui.label(RichText::new(line).strong());
        }
        None => {
            ui.label("No data in the selected date range.");
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let reload = ui.add_enabled(state.source.is_some(), egui::Button::new("Reload"));
            if reload.clicked() {
                if let Some(source) = state.source.clone() {
                    state.load(&source);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Source");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.source_input)
                .hint_text("path or https://…/day.csv")
                .desired_width(260.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Load").clicked() || submitted) && !state.source_input.trim().is_empty() {
            let source = DataSource::parse(state.source_input.trim());
            state.load(&source);
        }

        ui.separator();

        match (&state.table, &state.view) {
            (Some(table), Some(view)) => {
                ui.label(format!(
                    "{} days loaded, {} in range",
                    table.len(),
                    view.rows_in_range
                ));
            }
            (Some(table), None) => {
                ui.label(format!("{} days loaded", table.len()));
            }
            _ => {}
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&DataSource::Path(path));
    }
}
