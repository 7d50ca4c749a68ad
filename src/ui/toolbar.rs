use crate::app::EventsApp;
use crate::ui::theme;
use egui::{menu, Button, Color32, RichText, Ui};
use egui_phosphor::regular as icons;

/// Render the menu bar and the event action buttons.
pub fn show_toolbar(app: &mut EventsApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  Events  ", |ui| {
            if ui.button("  Add Event...").clicked() {
                app.open_add_dialog();
                ui.close_menu();
            }
            if ui.add_enabled(app.selected.is_some(), Button::new("  Edit Event...")).clicked() {
                app.open_edit_dialog();
                ui.close_menu();
            }
            if ui.add_enabled(app.selected.is_some(), Button::new("  Delete Event")).clicked() {
                app.delete_selected();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("  JSON  ", |ui| {
            if ui.button("  View JSON").clicked() {
                app.open_json_dialog(false);
                ui.close_menu();
            }
            if ui.button("  Edit JSON...").clicked() {
                app.open_json_dialog(true);
                ui.close_menu();
            }
        });

        ui.menu_button("  Help  ", |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });
    });

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        let add_btn = Button::new(
            RichText::new(format!("{}  Add Event", icons::PLUS)).color(Color32::WHITE),
        )
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
        if ui.add(add_btn).clicked() {
            app.open_add_dialog();
        }

        let has_selection = app.selected.is_some();
        let edit_btn = Button::new(format!("{}  Edit Event", icons::PENCIL_SIMPLE));
        if ui.add_enabled(has_selection, edit_btn).clicked() {
            app.open_edit_dialog();
        }
        let delete_btn = Button::new(format!("{}  Delete Event", icons::TRASH));
        if ui.add_enabled(has_selection, delete_btn).clicked() {
            app.delete_selected();
        }

        ui.separator();

        if ui.button(format!("{}  View JSON", icons::EYE)).clicked() {
            app.open_json_dialog(false);
        }
        if ui.button(format!("{}  Edit JSON", icons::BRACKETS_CURLY)).clicked() {
            app.open_json_dialog(true);
        }
    });
    ui.add_space(2.0);
}
