//! Wiring between the form, the pointer, the feature cache and the remote
//! service. Owns every piece of mutable editing state; the UI only feeds it
//! events.

use crate::interaction::{EditEvent, FormEvent, InteractionController, PointerEvent};
use crate::model::{Extent, FeatureId, FeatureKey};
use crate::snap::SnapAssist;
use crate::source::FeatureSource;
use crate::sync::{LoadResult, RemoteSync};
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// Keyboard commands the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    /// Backspace or Delete: remove the selected features.
    Delete,
    /// Abandon the sketch being drawn.
    Escape,
}

pub struct Editor {
    source: FeatureSource,
    controller: InteractionController,
    snap: SnapAssist,
    sync: RemoteSync,
    projection: String,
    /// Pick and finish tolerance in screen pixels.
    hit_tolerance_px: f64,
    loaded_rx: Receiver<LoadResult>,
}

impl Editor {
    pub fn new(
        sync: RemoteSync,
        loaded_rx: Receiver<LoadResult>,
        projection: impl Into<String>,
        snap: SnapAssist,
        hit_tolerance_px: f64,
    ) -> Self {
        Self {
            source: FeatureSource::new(),
            controller: InteractionController::new(),
            snap,
            sync,
            projection: projection.into(),
            hit_tolerance_px: hit_tolerance_px.max(0.0),
            loaded_rx,
        }
    }

    pub const fn source(&self) -> &FeatureSource {
        &self.source
    }

    pub const fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub const fn snap(&self) -> &SnapAssist {
        &self.snap
    }

    pub const fn snap_mut(&mut self) -> &mut SnapAssist {
        &mut self.snap
    }

    pub fn base_url(&self) -> &str {
        self.sync.base_url()
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn handle_form(&mut self, event: FormEvent) {
        self.controller.handle_form(event);
    }

    /// Lock or unlock editing. While locked no handler is active and the
    /// map only pans and zooms; unlocking restores the selectors' mode.
    pub fn set_editing(&mut self, enabled: bool) {
        if enabled {
            self.controller.activate();
        } else {
            self.controller.deactivate();
        }
    }

    /// Route one pointer event through snapping and the active handler.
    /// Returns whether the handler consumed it; unconsumed drags pan.
    pub fn handle_pointer(&mut self, mut event: PointerEvent, resolution: f64) -> bool {
        // Never snap a dragged vertex onto its own feature.
        let exclude = self.controller.dragging_feature();
        self.snap.apply(&mut event, &self.source, resolution, exclude);
        let outcome = self.controller.handle_pointer(
            &event,
            &mut self.source,
            self.hit_tolerance_px * resolution,
        );
        if let Some(edit) = outcome.edit {
            self.apply_edit(edit);
        }
        outcome.consumed
    }

    fn apply_edit(&mut self, edit: EditEvent) {
        match edit {
            EditEvent::DrawEnd(feature) => {
                let Some(key) = self.source.add_feature(feature) else {
                    return;
                };
                let id = FeatureId::generate();
                if !self.source.set_id(key, id) {
                    return;
                }
                if let Some(feature) = self.source.get(key) {
                    info!(
                        id = %feature.id_label(),
                        kind = feature.geometry.geometry_type().label(),
                        "feature drawn"
                    );
                    self.sync.create(feature);
                }
            }
            EditEvent::ModifyEnd(keys) => {
                debug!(count = keys.len(), "features modified");
                for feature in keys.into_iter().filter_map(|key| self.source.get(key)) {
                    self.sync.replace(feature);
                }
            }
        }
    }

    /// Returns whether the key did anything.
    pub fn handle_key(&mut self, key: EditorKey) -> bool {
        match key {
            EditorKey::Delete => !self.delete_selected().is_empty(),
            EditorKey::Escape => {
                let drawing = self
                    .controller
                    .sketch()
                    .is_some_and(|sketch| sketch.is_drawing());
                self.controller.abort();
                drawing
            }
        }
    }

    /// Remove the selection locally and ask the service to delete every
    /// removed feature that has an id.
    fn delete_selected(&mut self) -> Vec<FeatureKey> {
        let keys = self.controller.take_selection();
        for key in &keys {
            if let Some(feature) = self.source.remove_feature(*key) {
                info!(id = %feature.id_label(), "feature deleted");
                self.sync.delete(&feature);
            }
        }
        keys
    }

    /// Merge every finished extent query. Returns the number of new features.
    pub fn poll_loaded(&mut self) -> usize {
        let mut added = 0;
        while let Ok(result) = self.loaded_rx.try_recv() {
            added += self.source.apply_loaded(result);
        }
        added
    }

    /// Query the service for the visible extent unless it is already covered.
    pub fn load_view(&mut self, extent: Extent, resolution: f64) -> bool {
        self.source
            .load_extent(extent, resolution, &self.projection, &self.sync)
    }

    pub fn dump(&self) {
        self.source.dump();
    }

    /// Point the editor at another service. Loaded extents are forgotten so
    /// the next view queries the new service; cached features stay.
    pub fn set_base_url(&mut self, base_url: &str) -> bool {
        if !self.sync.set_base_url(base_url) {
            return false;
        }
        info!(base_url = self.sync.base_url(), "service changed");
        self.source.clear_loaded_extents();
        true
    }
}

#[cfg(test)]
mod tests;
