use crate::model::Coord;
use crate::util::f64_to_f32;
use crate::view_state::ViewState;
use egui::{Pos2, Rect, pos2};

/// Screen <-> map conversion for one frame of the canvas. Map y grows
/// upward, screen y downward.
#[derive(Debug, Clone, Copy)]
pub struct MapTransform {
    center: Coord,
    resolution: f64,
    origin: Pos2,
}

impl MapTransform {
    pub fn new(view: &ViewState, rect: Rect) -> Self {
        Self {
            center: view.center_coord(),
            resolution: view.resolution(),
            origin: rect.center(),
        }
    }

    pub fn to_map(&self, pos: Pos2) -> Coord {
        Coord::new(
            f64::from(pos.x - self.origin.x).mul_add(self.resolution, self.center.x),
            f64::from(self.origin.y - pos.y).mul_add(self.resolution, self.center.y),
        )
    }

    pub fn to_screen(&self, c: Coord) -> Pos2 {
        pos2(
            self.origin.x + f64_to_f32((c.x - self.center.x) / self.resolution),
            self.origin.y - f64_to_f32((c.y - self.center.y) / self.resolution),
        )
    }
}
