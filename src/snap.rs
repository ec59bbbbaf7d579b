//! Pointer snapping onto vertices and edges of existing features.

use crate::interaction::PointerEvent;
use crate::model::{Coord, FeatureKey, Geometry};
use crate::source::FeatureSource;
use rayon::prelude::*;

/// Above this many nearby features the candidate search runs on the rayon
/// pool.
const SNAP_PARALLEL_MIN_FEATURES: usize = 2_048;

/// What the pointer was snapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Vertex,
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    pub coord: Coord,
    pub kind: SnapKind,
    dist: f64,
}

impl SnapCandidate {
    fn beats(&self, other: &Self) -> bool {
        match (self.kind, other.kind) {
            (SnapKind::Vertex, SnapKind::Edge) => true,
            (SnapKind::Edge, SnapKind::Vertex) => false,
            _ => self.dist < other.dist,
        }
    }
}

fn better(a: Option<SnapCandidate>, b: Option<SnapCandidate>) -> Option<SnapCandidate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Passive snapping layered under whichever gesture is active. The editor
/// offers every pointer event here before the active handler sees it.
#[derive(Debug, Clone)]
pub struct SnapAssist {
    enabled: bool,
    pixel_tolerance: f64,
    last: Option<SnapCandidate>,
}

impl SnapAssist {
    pub const fn new(enabled: bool, pixel_tolerance: f64) -> Self {
        Self {
            enabled,
            pixel_tolerance,
            last: None,
        }
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.last = None;
        }
    }

    /// Snap target of the most recent event, for the on-map indicator.
    pub const fn indicator(&self) -> Option<SnapCandidate> {
        self.last
    }

    /// Rewrite the event coordinate onto nearby geometry. Returns whether the
    /// event was snapped.
    pub fn apply(
        &mut self,
        event: &mut PointerEvent,
        source: &FeatureSource,
        resolution: f64,
        exclude: Option<FeatureKey>,
    ) -> bool {
        self.last = if self.enabled {
            self.find(source, event.coordinate, resolution, exclude)
        } else {
            None
        };
        match self.last {
            Some(candidate) => {
                event.coordinate = candidate.coord;
                true
            }
            None => false,
        }
    }

    /// Nearest vertex within tolerance, else the nearest edge point.
    pub fn find(
        &self,
        source: &FeatureSource,
        at: Coord,
        resolution: f64,
        exclude: Option<FeatureKey>,
    ) -> Option<SnapCandidate> {
        let tolerance = self.pixel_tolerance.max(0.0) * resolution;
        if tolerance <= 0.0 || !at.is_finite() {
            return None;
        }
        let geometries: Vec<&Geometry> = source
            .features_near(at, tolerance)
            .into_iter()
            .filter(|(key, _)| Some(*key) != exclude)
            .map(|(_, f)| &f.geometry)
            .collect();
        if geometries.len() < SNAP_PARALLEL_MIN_FEATURES {
            geometries
                .iter()
                .map(|g| candidate_for(g, at, tolerance))
                .fold(None, better)
        } else {
            geometries
                .par_iter()
                .map(|g| candidate_for(g, at, tolerance))
                .reduce(|| None, better)
        }
    }
}

fn candidate_for(geometry: &Geometry, at: Coord, tolerance: f64) -> Option<SnapCandidate> {
    let mut best: Option<SnapCandidate> = None;
    for (_, vertex) in geometry.vertices() {
        let dist = vertex.distance(at);
        if dist <= tolerance {
            best = better(
                best,
                Some(SnapCandidate {
                    coord: vertex,
                    kind: SnapKind::Vertex,
                    dist,
                }),
            );
        }
    }
    if best.is_some() {
        return best;
    }
    for (_, a, b) in geometry.segments() {
        let on_edge = at.closest_on_segment(a, b);
        let dist = on_edge.distance(at);
        if dist > tolerance {
            continue;
        }
        // Close to a segment end: prefer the vertex itself.
        let end = if on_edge.distance_sq(a) <= on_edge.distance_sq(b) {
            a
        } else {
            b
        };
        let candidate = if end.distance(on_edge) <= tolerance {
            SnapCandidate {
                coord: end,
                kind: SnapKind::Vertex,
                dist: end.distance(at),
            }
        } else {
            SnapCandidate {
                coord: on_edge,
                kind: SnapKind::Edge,
                dist,
            }
        };
        best = better(best, Some(candidate));
    }
    best
}
