use super::{EditEvent, PointerEvent, PointerKind, PointerOutcome};
use crate::model::{Coord, Feature, Geometry, GeometryType};

/// Sketch of one geometry being drawn by clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawGesture {
    kind: GeometryType,
    vertices: Vec<Coord>,
    tip: Option<Coord>,
}

impl DrawGesture {
    pub const fn new(kind: GeometryType) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            tip: None,
        }
    }

    pub const fn kind(&self) -> GeometryType {
        self.kind
    }

    /// Placed vertices of the unfinished sketch.
    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }

    /// Pointer position trailing the last placed vertex.
    pub const fn tip(&self) -> Option<Coord> {
        self.tip
    }

    pub fn is_drawing(&self) -> bool {
        !self.vertices.is_empty()
    }

    pub fn abort(&mut self) {
        self.vertices.clear();
    }

    pub(super) fn handle(&mut self, event: &PointerEvent, hit_tolerance: f64) -> PointerOutcome {
        match event.kind {
            PointerKind::Move | PointerKind::Drag => {
                self.tip = Some(event.coordinate);
                // Drags pan the map while drawing.
                PointerOutcome::ignored()
            }
            PointerKind::Click | PointerKind::DoubleClick => {
                self.tip = Some(event.coordinate);
                match self.click(event.coordinate, hit_tolerance) {
                    Some(feature) => PointerOutcome::edit(EditEvent::DrawEnd(feature)),
                    None => PointerOutcome::consumed(),
                }
            }
            PointerKind::DragStart | PointerKind::DragEnd => PointerOutcome::ignored(),
        }
    }

    fn click(&mut self, at: Coord, hit_tolerance: f64) -> Option<Feature> {
        if self.kind == GeometryType::Point {
            return Some(Feature::new(Geometry::Point(at)));
        }
        if self.at_finish(at, hit_tolerance) {
            return Some(self.finish());
        }
        // A repeated click on the last vertex of a short sketch would leave a
        // zero-length segment.
        if self
            .vertices
            .last()
            .is_some_and(|last| last.distance(at) <= hit_tolerance)
        {
            return None;
        }
        self.vertices.push(at);
        None
    }

    /// Clicking the last vertex finishes; polygons also finish on the first.
    fn at_finish(&self, at: Coord, hit_tolerance: f64) -> bool {
        if self.vertices.len() < self.kind.min_vertices() {
            return false;
        }
        let near = |c: Option<&Coord>| c.is_some_and(|c| c.distance(at) <= hit_tolerance);
        near(self.vertices.last())
            || (self.kind == GeometryType::Polygon && near(self.vertices.first()))
    }

    fn finish(&mut self) -> Feature {
        let vertices = std::mem::take(&mut self.vertices);
        let geometry = if self.kind == GeometryType::Polygon {
            Geometry::polygon_from_open_ring(vertices)
        } else {
            Geometry::LineString(vertices)
        };
        Feature::new(geometry)
    }
}
