use super::super::MapEditorApp;

impl MapEditorApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(status) = &self.ui.last_status {
                ui.label(status);
                ui.separator();
            }
            ui.label(format!(
                "center {:.0}, {:.0}  zoom {:.2}",
                self.view.center[0], self.view.center[1], self.view.zoom
            ));
            if let Some(pointer) = self.ui.pointer_map {
                ui.separator();
                ui.monospace(format!("{:.1}, {:.1}", pointer.x, pointer.y));
            }
        });
    }
}
