//! Main egui/eframe application state and UI orchestration.

use crate::config::AppConfig;
use crate::editor::{Editor, EditorKey};
use crate::snap::SnapAssist;
use crate::sync::{HttpTransport, OfflineTransport, RemoteSync, Transport};
use crate::view_state::{ViewState, ViewStateStore};
use egui::{Context, Key};
use std::sync::mpsc;
use tracing::{error, info};

mod interaction;
mod ui;
mod ui_state;

use interaction::CanvasState;
use ui_state::UiState;

/// Top-level application state for the map editor.
pub struct MapEditorApp {
    config: AppConfig,
    editor: Editor,
    view: ViewState,
    view_store: ViewStateStore,
    canvas: CanvasState,
    ui: UiState,
}

impl MapEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let mut view_store = ViewStateStore::default();
        let view = view_store.load(cc.storage);

        let (loaded_tx, loaded_rx) = mpsc::channel();
        let transport: Box<dyn Transport> =
            match HttpTransport::new(loaded_tx, Some(cc.egui_ctx.clone())) {
                Ok(transport) => Box::new(transport),
                Err(err) => {
                    error!("{err:#}");
                    Box::new(OfflineTransport)
                }
            };
        let sync = RemoteSync::new(config.base_url.as_str(), transport);
        let snap = SnapAssist::new(config.snap.enabled, config.snap_tolerance());
        let editor = Editor::new(
            sync,
            loaded_rx,
            config.projection.as_str(),
            snap,
            config.hit_tolerance_px(),
        );
        info!(
            base_url = editor.base_url(),
            projection = editor.projection(),
            center = ?view.center,
            zoom = view.zoom,
            "editor started"
        );
        let ui = UiState::new(editor.base_url());

        Self {
            config,
            editor,
            view,
            view_store,
            canvas: CanvasState::default(),
            ui,
        }
    }

    fn poll_loaded(&mut self) {
        let added = self.editor.poll_loaded();
        if added > 0 {
            self.ui
                .set_status(format!("Loaded {added} feature(s) from the service"));
        }
    }

    fn handle_hotkeys(&mut self, ctx: &Context) {
        // Ignored while typing in text fields
        if ctx.wants_keyboard_input() {
            return;
        }
        // Ctrl/Cmd + B: toggle side panel
        if ctx.input(|i| i.key_pressed(Key::B) && i.modifiers.command) {
            self.ui.side_open = !self.ui.side_open;
        }
        if ctx.input(|i| i.key_pressed(Key::Backspace) || i.key_pressed(Key::Delete)) {
            let before = self.editor.source().len();
            if self.editor.handle_key(EditorKey::Delete) {
                let removed = before.saturating_sub(self.editor.source().len());
                self.ui.set_status(format!("Deleted {removed} feature(s)"));
            }
        }
        if ctx.input(|i| i.key_pressed(Key::Escape)) && self.editor.handle_key(EditorKey::Escape) {
            self.ui.set_status("Sketch discarded");
        }
    }
}

impl eframe::App for MapEditorApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        self.poll_loaded();
        self.handle_hotkeys(ctx);

        egui::SidePanel::right("form")
            .resizable(true)
            .default_width(240.0)
            .show_animated(ctx, self.ui.side_open, |ui| self.ui_side_form(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.ui_central_map(ui));

        if let Some(storage) = frame.storage_mut() {
            self.view_store.save_if_changed(storage, self.view);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.view_store.save(storage, self.view);
    }
}
