use super::{EditEvent, PointerEvent, PointerKind, PointerOutcome};
use crate::model::{Coord, FeatureKey, VertexRef};
use crate::source::FeatureSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VertexDrag {
    key: FeatureKey,
    vertex: VertexRef,
}

/// Select + modify pairing: clicks pick features, drags reshape the
/// selected ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyGesture {
    selection: Vec<FeatureKey>,
    drag: Option<VertexDrag>,
}

impl ModifyGesture {
    pub fn selection(&self) -> &[FeatureKey] {
        &self.selection
    }

    pub fn take_selection(&mut self) -> Vec<FeatureKey> {
        self.drag = None;
        std::mem::take(&mut self.selection)
    }

    pub fn dragging_feature(&self) -> Option<FeatureKey> {
        self.drag.map(|d| d.key)
    }

    pub(super) fn handle(
        &mut self,
        event: &PointerEvent,
        source: &mut FeatureSource,
        hit_tolerance: f64,
    ) -> PointerOutcome {
        // Features deleted elsewhere drop out of the selection.
        self.selection.retain(|key| source.contains(*key));
        let at = event.coordinate;
        match event.kind {
            PointerKind::Click | PointerKind::DoubleClick if event.modifiers.alt => {
                self.remove_vertex(source, at, hit_tolerance)
            }
            PointerKind::Click | PointerKind::DoubleClick => {
                self.select(source, at, hit_tolerance, event.modifiers.shift);
                PointerOutcome::consumed()
            }
            PointerKind::DragStart => {
                self.drag = self.grab(source, at, hit_tolerance);
                if self.drag.is_some() {
                    PointerOutcome::consumed()
                } else {
                    PointerOutcome::ignored()
                }
            }
            PointerKind::Drag => match self.drag {
                Some(drag) => {
                    source.edit_geometry(drag.key, |g| g.move_vertex(drag.vertex, at));
                    PointerOutcome::consumed()
                }
                None => PointerOutcome::ignored(),
            },
            PointerKind::DragEnd => match self.drag.take() {
                Some(drag) => {
                    source.edit_geometry(drag.key, |g| g.move_vertex(drag.vertex, at));
                    PointerOutcome::edit(EditEvent::ModifyEnd(self.selection.clone()))
                }
                None => PointerOutcome::ignored(),
            },
            PointerKind::Move => PointerOutcome::ignored(),
        }
    }

    fn select(&mut self, source: &FeatureSource, at: Coord, hit_tolerance: f64, toggle: bool) {
        let hit = source.feature_at(at, hit_tolerance);
        if !toggle {
            self.selection = hit.into_iter().collect();
            return;
        }
        if let Some(key) = hit {
            if let Some(pos) = self.selection.iter().position(|k| *k == key) {
                self.selection.remove(pos);
            } else {
                self.selection.push(key);
            }
        }
    }

    /// Grab a vertex of a selected feature, or split an edge and grab the
    /// new vertex.
    fn grab(
        &self,
        source: &mut FeatureSource,
        at: Coord,
        hit_tolerance: f64,
    ) -> Option<VertexDrag> {
        if let Some((key, vertex)) = self.nearest_vertex(source, at, hit_tolerance) {
            return Some(VertexDrag { key, vertex });
        }
        let (key, segment, on_edge) = self.nearest_segment(source, at, hit_tolerance)?;
        let vertex = source.edit_geometry(key, |g| g.insert_vertex(segment, on_edge))??;
        Some(VertexDrag { key, vertex })
    }

    fn remove_vertex(
        &mut self,
        source: &mut FeatureSource,
        at: Coord,
        hit_tolerance: f64,
    ) -> PointerOutcome {
        let Some((key, vertex)) = self.nearest_vertex(source, at, hit_tolerance) else {
            return PointerOutcome::ignored();
        };
        let removed = source
            .edit_geometry(key, |geometry| geometry.remove_vertex(vertex))
            .unwrap_or(false);
        if removed {
            PointerOutcome::edit(EditEvent::ModifyEnd(self.selection.clone()))
        } else {
            PointerOutcome::consumed()
        }
    }

    fn nearest_vertex(
        &self,
        source: &FeatureSource,
        at: Coord,
        hit_tolerance: f64,
    ) -> Option<(FeatureKey, VertexRef)> {
        self.selection
            .iter()
            .filter_map(|key| source.get(*key).map(|f| (*key, f)))
            .flat_map(|(key, f)| {
                f.geometry
                    .vertices()
                    .into_iter()
                    .map(move |(vertex, c)| (key, vertex, c.distance(at)))
            })
            .filter(|(_, _, dist)| *dist <= hit_tolerance)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(key, vertex, _)| (key, vertex))
    }

    fn nearest_segment(
        &self,
        source: &FeatureSource,
        at: Coord,
        hit_tolerance: f64,
    ) -> Option<(FeatureKey, VertexRef, Coord)> {
        self.selection
            .iter()
            .filter_map(|key| source.get(*key).map(|f| (*key, f)))
            .flat_map(|(key, f)| {
                f.geometry.segments().into_iter().map(move |(segment, a, b)| {
                    let on_edge = at.closest_on_segment(a, b);
                    (key, segment, on_edge, on_edge.distance(at))
                })
            })
            .filter(|(.., dist)| *dist <= hit_tolerance)
            .min_by(|a, b| a.3.total_cmp(&b.3))
            .map(|(key, segment, on_edge, _)| (key, segment, on_edge))
    }
}
