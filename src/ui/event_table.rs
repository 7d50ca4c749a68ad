use crate::model::EventCollection;
use crate::ui::theme;
use egui::{Color32, RichText, Ui};

const NAME_WIDTH: f32 = 180.0;
const TIME_WIDTH: f32 = 150.0;

/// Actions that the event table can request.
pub enum EventTableAction {
    None,
    Select(usize),
    ClearSelection,
}

/// Render the event table: name, start, end and time remaining per row.
pub fn show_event_table(events: &EventCollection, ui: &mut Ui) -> EventTableAction {
    let mut action = EventTableAction::None;

    // Header area
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Events")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.label(
            RichText::new(format!("({})", events.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    // Column headers
    ui.horizontal(|ui| {
        ui.add_space(6.0);
        let hdr = |ui: &mut Ui, text: &str, width: f32| {
            ui.allocate_ui(egui::vec2(width, 16.0), |ui| {
                ui.label(RichText::new(text).size(9.0).color(theme::TEXT_DIM).strong());
            });
        };
        hdr(ui, "NAME", NAME_WIDTH);
        hdr(ui, "START", TIME_WIDTH);
        hdr(ui, "END", TIME_WIDTH);
        hdr(ui, "TIME REMAINING", TIME_WIDTH);
    });
    ui.separator();

    if events.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new("No events yet. Use \"Add Event\" to create one.").color(theme::TEXT_DIM));
        return action;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (i, event) in events.iter().enumerate() {
                let view = event.view();
                let row_bg = if view.is_selected() {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };
                let text_color = if view.is_selected() {
                    Color32::WHITE
                } else {
                    theme::TEXT_PRIMARY
                };

                let frame_resp = egui::Frame::none()
                    .fill(row_bg)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(6.0, 4.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let cell = |ui: &mut Ui, text: &str, width: f32, color: Color32| {
                                ui.allocate_ui(egui::vec2(width, 18.0), |ui| {
                                    ui.add(egui::Label::new(RichText::new(text).size(12.0).color(color)).truncate());
                                });
                            };
                            cell(ui, view.name_text(), NAME_WIDTH, text_color);
                            cell(ui, view.start_text(), TIME_WIDTH, theme::TEXT_SECONDARY);
                            cell(ui, view.end_text(), TIME_WIDTH, theme::TEXT_SECONDARY);
                            cell(ui, view.remaining_text(), TIME_WIDTH, text_color);
                            // Stretch to the panel edge so the whole row is clickable
                            ui.allocate_space(egui::vec2(ui.available_width(), 0.0));
                        });
                    });

                // The row index is the only link from widget back to event
                if view.is_selectable() {
                    let row_click = ui.interact(
                        frame_resp.response.rect,
                        egui::Id::new(("event-row", i)),
                        egui::Sense::click(),
                    );
                    if row_click.clicked() {
                        action = EventTableAction::Select(i);
                    }
                }

                ui.add_space(1.0);
            }

            // Empty click below the rows clears selection
            let rest = ui.allocate_response(ui.available_size(), egui::Sense::click());
            if rest.clicked() {
                action = EventTableAction::ClearSelection;
            }
        });

    action
}
