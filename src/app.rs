use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::config::AppSettings;
use crate::error::ImportError;
use crate::io::{self, Storage};
use crate::model::{Event, EventCollection, EventInput, GanttChart};
use crate::ui;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Whether the event dialog creates a new event or edits the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit,
}

/// Field state of the Add/Edit Event dialog.
#[derive(Debug, Clone)]
pub struct EventDialogState {
    pub mode: DialogMode,
    pub name: String,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub end_date: NaiveDate,
    pub end_time: String,
    pub error: Option<String>,
}

impl EventDialogState {
    /// Empty name, start and end both at `now`.
    pub fn for_new(now: DateTime<Local>) -> Self {
        let time = now.format(TIME_FORMAT).to_string();
        Self {
            mode: DialogMode::Add,
            name: String::new(),
            start_date: now.date_naive(),
            start_time: time.clone(),
            end_date: now.date_naive(),
            end_time: time,
            error: None,
        }
    }

    pub fn for_event(event: &Event) -> Self {
        let start = event.start().with_timezone(&Local);
        let end = event.end().with_timezone(&Local);
        Self {
            mode: DialogMode::Edit,
            name: event.name().to_string(),
            start_date: start.date_naive(),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_date: end.date_naive(),
            end_time: end.format(TIME_FORMAT).to_string(),
            error: None,
        }
    }

    /// Combine the date pickers and time fields into an event input, in the
    /// local time zone.
    pub fn to_input(&self) -> Result<EventInput, String> {
        let start = local_instant(self.start_date, &self.start_time).map_err(|e| format!("Start: {e}"))?;
        let end = local_instant(self.end_date, &self.end_time).map_err(|e| format!("End: {e}"))?;
        Ok(EventInput::new(self.name.clone(), start, end))
    }
}

fn local_instant(date: NaiveDate, time: &str) -> Result<DateTime<Utc>, String> {
    let time = time.trim();
    let parsed = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map_err(|_| format!("'{time}' is not a time (expected HH:MM:SS)"))?;
    NaiveDateTime::new(date, parsed)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{date} {parsed} does not exist in the local time zone"))
}

/// State of the View/Edit JSON dialog.
#[derive(Debug, Clone)]
pub struct JsonDialogState {
    pub editable: bool,
    pub text: String,
    pub error: Option<String>,
}

/// Main application state and controller.
pub struct EventsApp {
    pub events: EventCollection,
    pub chart: GanttChart,
    pub settings: AppSettings,
    /// Directory the events file lives in; `None` when nothing is saved to disk.
    pub data_dir: Option<PathBuf>,
    /// Index of the event targeted by Edit and Delete.
    pub selected: Option<usize>,

    // Dialog state
    pub event_dialog: Option<EventDialogState>,
    pub json_dialog: Option<JsonDialogState>,
    pub show_about: bool,

    // Status message
    pub status_message: String,
}

impl EventsApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings = AppSettings::load();
        let storage = settings.storage();
        let data_dir = storage.as_ref().map(|s| s.dir().to_path_buf());
        let events = EventCollection::with_format(
            storage.map(|s| Box::new(s) as Box<dyn Storage>),
            settings.datetime_format.clone(),
        );
        let mut app = Self::with_collection(events, settings);
        app.data_dir = data_dir;
        app.events.start_refreshing();
        app
    }

    pub fn with_collection(events: EventCollection, settings: AppSettings) -> Self {
        let mut app = Self {
            events,
            chart: GanttChart::new(),
            settings,
            data_dir: None,
            selected: None,
            event_dialog: None,
            json_dialog: None,
            show_about: false,
            status_message: "Ready".to_string(),
        };
        app.refresh_chart();
        app
    }

    pub fn refresh_chart(&mut self) {
        self.chart.refresh(&self.events, Utc::now());
    }

    // --- Selection ---

    pub fn forget_selected(&mut self) {
        if let Some(index) = self.selected.take() {
            if let Some(event) = self.events.get_mut(index) {
                event.deselect();
            }
        }
    }

    pub fn select_event(&mut self, index: usize) {
        self.forget_selected();
        if let Some(event) = self.events.get_mut(index) {
            event.select();
            self.selected = Some(index);
        }
    }

    // --- Event operations ---

    pub fn open_add_dialog(&mut self) {
        self.forget_selected();
        self.event_dialog = Some(EventDialogState::for_new(Local::now()));
    }

    pub fn open_edit_dialog(&mut self) {
        if let Some(event) = self.selected.and_then(|i| self.events.get(i)) {
            self.event_dialog = Some(EventDialogState::for_event(event));
        }
    }

    pub fn add_event(&mut self, input: EventInput) {
        let name = self.events.add_new(input).name().to_string();
        self.refresh_chart();
        self.status_message = format!("Added '{name}'");
    }

    pub fn edit_selected(&mut self, input: EventInput) {
        let Some(index) = self.selected else {
            return;
        };
        match self.events.update_at(index, input) {
            Ok(event) => self.status_message = format!("Updated '{}'", event.name()),
            Err(e) => {
                tracing::warn!(error = %e, "Edit of stale selection");
                self.selected = None;
            }
        }
        self.refresh_chart();
    }

    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        self.forget_selected();
        match self.events.remove_at(index) {
            Ok(event) => self.status_message = format!("Deleted '{}'", event.name()),
            Err(e) => tracing::warn!(error = %e, "Delete of stale selection"),
        }
        self.refresh_chart();
    }

    // --- JSON ---

    pub fn open_json_dialog(&mut self, editable: bool) {
        self.json_dialog = Some(JsonDialogState {
            editable,
            text: io::to_pretty_json(&self.events.to_records()),
            error: None,
        });
    }

    /// Replace every event with the parsed `text`. Nothing changes on error.
    pub fn apply_json_import(&mut self, text: &str) -> Result<usize, ImportError> {
        let inputs = io::parse_import(text)?;
        self.forget_selected();
        self.events.load_from_records(inputs);
        self.refresh_chart();
        let count = self.events.len();
        tracing::info!(count, "Imported events from JSON");
        self.status_message = format!("Imported {count} events");
        Ok(count)
    }

    pub fn open_data_folder(&mut self) {
        let Some(dir) = &self.data_dir else {
            self.status_message = "Events are not being saved to disk".to_string();
            return;
        };
        let result = std::fs::create_dir_all(dir).and_then(|()| open::that(dir));
        if let Err(e) = result {
            tracing::warn!(path = %dir.display(), error = %e, "Could not open data folder");
            self.status_message = format!("Could not open {}: {e}", dir.display());
        }
    }
}

impl eframe::App for EventsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if self.events.tick(now) {
            // Keeps the chart's "now" line moving with the countdowns
            self.refresh_chart();
        }
        if let Some(wait) = self.events.until_next_refresh(now) {
            ctx.request_repaint_after(wait);
        }

        ui::theme::apply_theme(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let saving = if self.events.storage().is_some() { "" } else { " · not saved" };
                        ui.label(
                            egui::RichText::new(format!("Events: {}{}", self.events.len(), saving))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Lower panel: Gantt chart
        egui::TopBottomPanel::bottom("gantt_panel")
            .resizable(true)
            .default_height(240.0)
            .frame(egui::Frame::none().fill(ui::theme::BG_DARK))
            .show(ctx, |ui| {
                ui::gantt_chart::show_gantt_chart(&self.chart, self.selected, ui);
            });

        // Central panel: event table
        let mut table_action = ui::event_table::EventTableAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            table_action = ui::event_table::show_event_table(&self.events, ui);
        });

        match table_action {
            ui::event_table::EventTableAction::Select(index) => self.select_event(index),
            ui::event_table::EventTableAction::ClearSelection => self.forget_selected(),
            ui::event_table::EventTableAction::None => {}
        }

        // Dialogs
        if self.event_dialog.is_some() {
            ui::dialogs::show_event_dialog(self, ctx);
        }
        if self.json_dialog.is_some() {
            ui::dialogs::show_json_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
