//! R-tree over map extents, used for feature envelopes and loaded query
//! extents.

use crate::model::{Coord, Extent};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree, RTreeObject};

type Entry<T> = GeomWithData<Rectangle<[f64; 2]>, T>;

fn rectangle(extent: &Extent) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners([extent.min_x, extent.min_y], [extent.max_x, extent.max_y])
}

fn envelope(extent: &Extent) -> AABB<[f64; 2]> {
    AABB::from_corners([extent.min_x, extent.min_y], [extent.max_x, extent.max_y])
}

fn extent_of<T>(entry: &Entry<T>) -> Extent {
    let aabb = entry.envelope();
    let (lo, hi) = (aabb.lower(), aabb.upper());
    Extent::new(lo[0], lo[1], hi[0], hi[1])
}

/// Extents tagged with a payload, queried by intersection.
pub struct ExtentIndex<T> {
    tree: RTree<Entry<T>>,
}

impl<T> std::fmt::Debug for ExtentIndex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtentIndex")
            .field("len", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ExtentIndex<T> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T: PartialEq> ExtentIndex<T> {
    pub fn insert(&mut self, extent: &Extent, data: T) {
        self.tree.insert(GeomWithData::new(rectangle(extent), data));
    }

    /// Remove the entry stored under exactly `extent` and `data`.
    pub fn remove(&mut self, extent: &Extent, data: T) -> bool {
        self.tree
            .remove(&GeomWithData::new(rectangle(extent), data))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Entries whose extent intersects `extent`, edges included.
    pub fn intersecting(&self, extent: &Extent) -> impl Iterator<Item = (Extent, &T)> {
        self.tree
            .locate_in_envelope_intersecting(&envelope(extent))
            .map(|entry| (extent_of(entry), &entry.data))
    }

    /// Entries within `tolerance` of `at` by bounding box.
    pub fn near(&self, at: Coord, tolerance: f64) -> impl Iterator<Item = &T> {
        let probe = Extent::new(at.x, at.y, at.x, at.y).buffered(tolerance);
        self.tree
            .locate_in_envelope_intersecting(&envelope(&probe))
            .map(|entry| &entry.data)
    }

    /// First entry whose extent covers `extent` entirely.
    pub fn covering(&self, extent: &Extent) -> Option<(Extent, &T)> {
        self.intersecting(extent)
            .find(|(candidate, _)| candidate.contains_extent(extent))
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (Extent, &T)> {
        self.tree.iter().map(|entry| (extent_of(entry), &entry.data))
    }
}
