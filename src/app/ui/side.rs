//! Side panel form: draw type, interaction, service URL and the dump button.

use super::super::MapEditorApp;
use crate::interaction::{FormEvent, InteractionKind};
use crate::model::GeometryType;
use egui::{RichText, TextEdit};

impl MapEditorApp {
    pub(crate) fn ui_side_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Editing");
        ui.separator();

        let current_type = self.editor.controller().draw_type();
        let mut draw_type = current_type;
        ui.label("Geometry type");
        ui.horizontal_wrapped(|ui| {
            for kind in GeometryType::ALL {
                ui.radio_value(&mut draw_type, kind, kind.label());
            }
        });
        if draw_type != current_type {
            self.editor
                .handle_form(FormEvent::DrawTypeChanged(draw_type));
        }

        let current_interaction = self.editor.controller().interaction();
        let mut interaction = current_interaction;
        ui.label("Interaction");
        ui.horizontal(|ui| {
            for kind in InteractionKind::ALL {
                ui.radio_value(&mut interaction, kind, kind.label());
            }
        });
        if interaction != current_interaction {
            self.editor
                .handle_form(FormEvent::InteractionChanged(interaction));
        }

        let mut editing = self.editor.controller().active_kind().is_some();
        if ui
            .checkbox(&mut editing, "Editing enabled")
            .on_hover_text("Uncheck to browse the map without touching features")
            .changed()
        {
            self.editor.set_editing(editing);
        }

        let mut snap_enabled = self.editor.snap().enabled();
        if ui
            .checkbox(&mut snap_enabled, "Snap to features")
            .on_hover_text("Pull the pointer onto nearby vertices and edges")
            .changed()
        {
            self.editor.snap_mut().set_enabled(snap_enabled);
        }

        ui.add_space(4.0);
        ui.label(RichText::new(self.mode_hint()).small().weak());
        ui.separator();

        ui.heading("Service");
        ui.separator();
        let response = ui.add(
            TextEdit::singleline(&mut self.ui.url_text)
                .hint_text("http://host:port")
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() {
            let url = self.ui.url_text.clone();
            if self.editor.set_base_url(&url) {
                self.ui.set_status(format!("Service set to {}", self.editor.base_url()));
            }
            self.ui.url_text = self.editor.base_url().to_string();
        }
        ui.horizontal(|ui| {
            ui.label("Projection");
            ui.monospace(self.editor.projection());
        });
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .button("Dump")
                .on_hover_text("Write every loaded feature to the log as GeoJSON")
                .clicked()
            {
                self.editor.dump();
                self.ui.set_status(format!(
                    "Dumped {} feature(s) to the log",
                    self.editor.source().len()
                ));
            }
            ui.label(format!("{} feature(s)", self.editor.source().len()));
        });
        let selected = self.editor.controller().selection().len();
        if selected > 0 {
            ui.label(format!("{selected} selected"));
        }
    }

    fn mode_hint(&self) -> &'static str {
        let controller = self.editor.controller();
        match (controller.interaction(), controller.draw_type()) {
            (InteractionKind::Modify, _) => {
                "Click to select, Shift+click to add. Drag a vertex or edge to reshape, \
                 Alt+click removes a vertex. Backspace deletes the selection."
            }
            (InteractionKind::Draw, GeometryType::Point) => "Click to place a point.",
            (InteractionKind::Draw, GeometryType::LineString) => {
                "Click to add vertices, click the last vertex again to finish. Esc discards."
            }
            (InteractionKind::Draw, GeometryType::Polygon) => {
                "Click to add vertices, click the first or last vertex to close. Esc discards."
            }
        }
    }
}
