use super::{Coord, Extent};
use serde::{Deserialize, Serialize};

/// Geometry kinds the editor can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl GeometryType {
    /// Ordered list of geometry types exposed in the UI.
    pub const ALL: [Self; 3] = [Self::Point, Self::LineString, Self::Polygon];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
        }
    }

    /// Vertices needed before a sketch of this type can be finished.
    pub const fn min_vertices(self) -> usize {
        match self {
            Self::Point => 1,
            Self::LineString => 2,
            Self::Polygon => 3,
        }
    }
}

/// Address of an editable vertex: ring 0 for points and lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub ring: usize,
    pub index: usize,
}

impl VertexRef {
    pub const fn new(ring: usize, index: usize) -> Self {
        Self { ring, index }
    }
}

/// Point, line or polygon in projected map coordinates; serialized as a
/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Closed rings: the first coordinate is repeated at the end.
    Polygon(Vec<Vec<Coord>>),
}

impl Geometry {
    pub const fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::LineString(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// Build a polygon from an open ring, appending the closing vertex.
    pub fn polygon_from_open_ring(mut ring: Vec<Coord>) -> Self {
        if let Some(first) = ring.first().copied()
            && ring.last() != Some(&first)
        {
            ring.push(first);
        }
        Self::Polygon(vec![ring])
    }

    /// Editable vertices. Closing duplicates of polygon rings are not listed.
    pub fn vertices(&self) -> Vec<(VertexRef, Coord)> {
        match self {
            Self::Point(c) => vec![(VertexRef::new(0, 0), *c)],
            Self::LineString(coords) => coords
                .iter()
                .enumerate()
                .map(|(i, c)| (VertexRef::new(0, i), *c))
                .collect(),
            Self::Polygon(rings) => rings
                .iter()
                .enumerate()
                .flat_map(|(r, ring)| {
                    open_ring(ring)
                        .iter()
                        .enumerate()
                        .map(move |(i, c)| (VertexRef::new(r, i), *c))
                })
                .collect(),
        }
    }

    /// Edges as `(start vertex, a, b)`; ring closing edges included.
    pub fn segments(&self) -> Vec<(VertexRef, Coord, Coord)> {
        let chain = |r: usize, coords: &[Coord]| {
            coords
                .windows(2)
                .enumerate()
                .map(|(i, w)| (VertexRef::new(r, i), w[0], w[1]))
                .collect::<Vec<_>>()
        };
        match self {
            Self::Point(_) => Vec::new(),
            Self::LineString(coords) => chain(0, coords),
            Self::Polygon(rings) => rings
                .iter()
                .enumerate()
                .flat_map(|(r, ring)| chain(r, ring))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn vertex(&self, at: VertexRef) -> Option<Coord> {
        match self {
            Self::Point(c) => (at.ring == 0 && at.index == 0).then_some(*c),
            Self::LineString(coords) => coords.get(at.index).copied().filter(|_| at.ring == 0),
            Self::Polygon(rings) => open_ring(rings.get(at.ring)?).get(at.index).copied(),
        }
    }

    /// Move a vertex; the closing duplicate of a ring follows its first vertex.
    pub fn move_vertex(&mut self, at: VertexRef, to: Coord) -> bool {
        match self {
            Self::Point(c) => {
                if at.ring != 0 || at.index != 0 {
                    return false;
                }
                *c = to;
                true
            }
            Self::LineString(coords) => {
                let Some(slot) = coords.get_mut(at.index).filter(|_| at.ring == 0) else {
                    return false;
                };
                *slot = to;
                true
            }
            Self::Polygon(rings) => {
                let Some(ring) = rings.get_mut(at.ring) else {
                    return false;
                };
                let open_len = open_ring(ring).len();
                if at.index >= open_len {
                    return false;
                }
                ring[at.index] = to;
                if at.index == 0 && ring.len() > open_len {
                    let last = ring.len() - 1;
                    ring[last] = to;
                }
                true
            }
        }
    }

    /// Insert a vertex on the edge that starts at `segment`; returns the new
    /// vertex address.
    pub fn insert_vertex(&mut self, segment: VertexRef, at: Coord) -> Option<VertexRef> {
        let coords = match self {
            Self::Point(_) => return None,
            Self::LineString(coords) if segment.ring == 0 => coords,
            Self::LineString(_) => return None,
            Self::Polygon(rings) => rings.get_mut(segment.ring)?,
        };
        if segment.index + 1 >= coords.len() {
            return None;
        }
        coords.insert(segment.index + 1, at);
        Some(VertexRef::new(segment.ring, segment.index + 1))
    }

    /// Remove a vertex unless that would leave the geometry degenerate.
    pub fn remove_vertex(&mut self, at: VertexRef) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(coords) => {
                if at.ring != 0 || at.index >= coords.len() || coords.len() <= 2 {
                    return false;
                }
                coords.remove(at.index);
                true
            }
            Self::Polygon(rings) => {
                let Some(ring) = rings.get_mut(at.ring) else {
                    return false;
                };
                let open_len = open_ring(ring).len();
                if at.index >= open_len || open_len <= 3 {
                    return false;
                }
                let closed = ring.len() > open_len;
                ring.remove(at.index);
                if closed && at.index == 0 {
                    let last = ring.len() - 1;
                    ring[last] = ring[0];
                }
                true
            }
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::from_coords(self.vertices().into_iter().map(|(_, c)| c))
    }
}

fn open_ring(ring: &[Coord]) -> &[Coord] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}
