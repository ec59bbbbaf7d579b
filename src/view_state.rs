//! Map view (center and zoom) persisted across sessions.

use crate::model::{Coord, Extent};
use eframe::Storage;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const CENTER_KEY: &str = "center";
pub const ZOOM_KEY: &str = "zoom";

pub const DEFAULT_CENTER: [f64; 2] = [3_374_339.0, 8_388_441.0];
pub const DEFAULT_ZOOM: f64 = 12.0;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 28.0;

/// Resolution at zoom 0 of the web-mercator zoom ladder (map units per pixel).
const MAX_RESOLUTION: f64 = 156_543.033_928_040_97;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewState {
    pub const fn center_coord(&self) -> Coord {
        Coord::new(self.center[0], self.center[1])
    }

    pub fn resolution(&self) -> f64 {
        MAX_RESOLUTION / 2f64.powf(self.zoom)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Change zoom while keeping `anchor` at the same screen position.
    pub fn zoom_about(&mut self, zoom: f64, anchor: Coord) {
        let before = self.resolution();
        self.set_zoom(zoom);
        let ratio = self.resolution() / before;
        self.center = [
            (self.center[0] - anchor.x).mul_add(ratio, anchor.x),
            (self.center[1] - anchor.y).mul_add(ratio, anchor.y),
        ];
    }

    /// Shift the center by a screen-space delta in pixels (y down).
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        let res = self.resolution();
        self.center[0] -= dx * res;
        self.center[1] += dy * res;
    }

    /// Map extent covered by a viewport of `size` pixels.
    pub fn visible_extent(&self, size: [f64; 2]) -> Extent {
        let res = self.resolution();
        let half_w = size[0] * res * 0.5;
        let half_h = size[1] * res * 0.5;
        Extent::new(
            self.center[0] - half_w,
            self.center[1] - half_h,
            self.center[0] + half_w,
            self.center[1] + half_h,
        )
    }
}

/// Reads and writes [`ViewState`] in a string key/value store.
#[derive(Debug, Default)]
pub struct ViewStateStore {
    last_saved: Option<ViewState>,
}

impl ViewStateStore {
    /// Restore the persisted view. Missing or malformed entries fall back to
    /// the defaults; this never fails.
    pub fn load(&mut self, storage: Option<&dyn Storage>) -> ViewState {
        let defaults = ViewState::default();
        let center = read_json::<[f64; 2]>(storage, CENTER_KEY)
            .filter(|c| c.iter().all(|v| v.is_finite()))
            .unwrap_or(defaults.center);
        let zoom = read_json::<f64>(storage, ZOOM_KEY)
            .filter(|z| z.is_finite())
            .unwrap_or(defaults.zoom);
        let mut state = ViewState { center, zoom };
        state.set_zoom(zoom);
        self.last_saved = Some(state);
        state
    }

    /// Persist the view. Best effort: the store gives no failure signal.
    pub fn save(&mut self, storage: &mut dyn Storage, state: ViewState) {
        if let Ok(center) = serde_json::to_string(&state.center) {
            storage.set_string(CENTER_KEY, center);
        }
        if let Ok(zoom) = serde_json::to_string(&state.zoom) {
            storage.set_string(ZOOM_KEY, zoom);
        }
        self.last_saved = Some(state);
    }

    /// Persist only when the view moved since the last save or load.
    pub fn save_if_changed(&mut self, storage: &mut dyn Storage, state: ViewState) -> bool {
        if self.last_saved == Some(state) {
            return false;
        }
        self.save(storage, state);
        true
    }
}

fn read_json<T: DeserializeOwned>(storage: Option<&dyn Storage>, key: &str) -> Option<T> {
    let raw = storage?.get_string(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(key, %err, "discarding unparsable persisted view value");
            None
        }
    }
}
