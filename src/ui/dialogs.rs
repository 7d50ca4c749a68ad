use crate::app::{DialogMode, EventsApp};
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Render the "Add Event" / "Edit Event" dialog.
pub fn show_event_dialog(app: &mut EventsApp, ctx: &Context) {
    let Some(state) = app.event_dialog.as_mut() else {
        return;
    };
    let (title, save_label, cancel_label) = match state.mode {
        DialogMode::Add => ("Add Event", "Add event", "Cancel"),
        DialogMode::Edit => ("Edit Event", "Save changes", "Discard changes"),
    };

    let mut submit = false;
    let mut should_close = false;
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("event_dialog_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut state.name).hint_text("Event name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut state.start_date).id_salt("dlg_dp_start"));
                        ui.add_sized([80.0, 22.0], egui::TextEdit::singleline(&mut state.start_time).hint_text("HH:MM:SS"));
                    });
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut state.end_date).id_salt("dlg_dp_end"));
                        ui.add_sized([80.0, 22.0], egui::TextEdit::singleline(&mut state.end_time).hint_text("HH:MM:SS"));
                    });
                    ui.end_row();
                });

            if let Some(error) = &state.error {
                ui.add_space(4.0);
                ui.colored_label(theme::TEXT_ERROR, error);
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let save_btn = egui::Button::new(RichText::new(save_label).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([110.0, 28.0], save_btn).clicked() {
                    submit = true;
                }
                if ui.add_sized([110.0, 28.0], egui::Button::new(cancel_label)).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if submit {
        match state.to_input() {
            Ok(input) => {
                let mode = state.mode;
                app.event_dialog = None;
                match mode {
                    DialogMode::Add => app.add_event(input),
                    DialogMode::Edit => app.edit_selected(input),
                }
                return;
            }
            Err(e) => state.error = Some(e),
        }
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.event_dialog = None;
    }
}

/// Render the "View JSON" / "Edit JSON" dialog. Saving an edit replaces every
/// event; a parse error is shown inline and nothing is applied.
pub fn show_json_dialog(app: &mut EventsApp, ctx: &Context) {
    let Some(state) = app.json_dialog.as_mut() else {
        return;
    };
    let title = if state.editable { "Edit JSON" } else { "View JSON" };
    let screen = ctx.screen_rect();

    let mut save = false;
    let mut should_close = false;
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([screen.width() * 0.75, screen.height() * 0.75])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(screen.height() * 0.6)
                .show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut state.text)
                            .code_editor()
                            .interactive(state.editable)
                            .desired_rows(16)
                            .desired_width(f32::INFINITY),
                    );
                });

            if let Some(error) = &state.error {
                ui.add_space(4.0);
                ui.colored_label(theme::TEXT_ERROR, error);
            }

            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if state.editable {
                    let save_btn = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                        .fill(theme::ACCENT)
                        .rounding(egui::Rounding::same(4.0));
                    if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                        save = true;
                    }
                    if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                        should_close = true;
                    }
                } else if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if save {
        let text = state.text.clone();
        match app.apply_json_import(&text) {
            Ok(_) => app.json_dialog = None,
            Err(e) => {
                tracing::info!(error = %e, "Rejected JSON edit");
                if let Some(state) = app.json_dialog.as_mut() {
                    state.error = Some(e.to_string());
                }
            }
        }
        return;
    }
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.json_dialog = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut EventsApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Event Countdown").strong());
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .font(theme::font_header())
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Countdowns and a Gantt chart for your events,");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
