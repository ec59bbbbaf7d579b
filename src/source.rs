//! Viewport-indexed, in-memory feature cache filled by extent queries.

use crate::model::{Coord, Extent, Feature, FeatureId, FeatureKey, Geometry};
use crate::spatial::ExtentIndex;
use crate::sync::{LoadResult, RemoteSync};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Owns every feature the editor knows about.
#[derive(Debug, Default)]
pub struct FeatureSource {
    features: BTreeMap<FeatureKey, Feature>,
    id_index: HashMap<FeatureId, FeatureKey>,
    /// Geometry envelopes by feature.
    envelopes: ExtentIndex<FeatureKey>,
    /// Queried extents, tagged with the resolution they were loaded at.
    loaded: ExtentIndex<f64>,
    next_key: u64,
}

impl FeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(&key)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.features.contains_key(&key)
    }

    /// Features in insertion order (later ones paint on top).
    pub fn features(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.features.iter().map(|(k, f)| (*k, f))
    }

    /// Add a feature. One whose id is already present is skipped, since
    /// overlapping extent queries return the same features again.
    pub fn add_feature(&mut self, feature: Feature) -> Option<FeatureKey> {
        if let Some(id) = &feature.id
            && self.id_index.contains_key(id)
        {
            return None;
        }
        let key = FeatureKey(self.next_key);
        self.next_key += 1;
        if let Some(id) = &feature.id {
            self.id_index.insert(id.clone(), key);
        }
        if let Some(extent) = feature.geometry.extent() {
            self.envelopes.insert(&extent, key);
        }
        self.features.insert(key, feature);
        Some(key)
    }

    pub fn add_features(
        &mut self,
        features: impl IntoIterator<Item = Feature>,
    ) -> Vec<FeatureKey> {
        features
            .into_iter()
            .filter_map(|f| self.add_feature(f))
            .collect()
    }

    /// Assign an id to a feature that has none yet.
    pub fn set_id(&mut self, key: FeatureKey, id: FeatureId) -> bool {
        if self.id_index.contains_key(&id) {
            return false;
        }
        let Some(feature) = self.features.get_mut(&key) else {
            return false;
        };
        if let Some(old) = feature.id.replace(id.clone()) {
            self.id_index.remove(&old);
        }
        self.id_index.insert(id, key);
        true
    }

    /// Edit a feature's geometry in place; its envelope is re-indexed after.
    pub fn edit_geometry<R>(
        &mut self,
        key: FeatureKey,
        edit: impl FnOnce(&mut Geometry) -> R,
    ) -> Option<R> {
        let feature = self.features.get_mut(&key)?;
        if let Some(before) = feature.geometry.extent() {
            self.envelopes.remove(&before, key);
        }
        let result = edit(&mut feature.geometry);
        if let Some(after) = feature.geometry.extent() {
            self.envelopes.insert(&after, key);
        }
        Some(result)
    }

    pub fn remove_feature(&mut self, key: FeatureKey) -> Option<Feature> {
        let feature = self.features.remove(&key)?;
        if let Some(id) = &feature.id {
            self.id_index.remove(id);
        }
        if let Some(extent) = feature.geometry.extent() {
            self.envelopes.remove(&extent, key);
        }
        Some(feature)
    }

    /// Features whose envelope intersects `extent`, in insertion order.
    pub fn features_in(&self, extent: &Extent) -> Vec<(FeatureKey, &Feature)> {
        self.collect_ordered(self.envelopes.intersecting(extent).map(|(_, key)| *key))
    }

    /// Features whose envelope lies within `tolerance` of `at`, in insertion
    /// order.
    pub fn features_near(&self, at: Coord, tolerance: f64) -> Vec<(FeatureKey, &Feature)> {
        self.collect_ordered(self.envelopes.near(at, tolerance).copied())
    }

    fn collect_ordered(
        &self,
        keys: impl Iterator<Item = FeatureKey>,
    ) -> Vec<(FeatureKey, &Feature)> {
        let mut keys: Vec<FeatureKey> = keys.collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|key| self.features.get(&key).map(|f| (key, f)))
            .collect()
    }

    /// Extent strategy: `Some(extent)` when no loaded extent covers it yet.
    /// The extent is recorded as loaded right away so that repeated calls
    /// while the query is in flight do not issue it again.
    pub fn plan_load(&mut self, extent: Extent, resolution: f64) -> Option<Extent> {
        if extent.is_empty() {
            return None;
        }
        if let Some((_, loaded_at)) = self.loaded.covering(&extent) {
            debug!(
                rect = %extent.query_value(),
                loaded_at = *loaded_at,
                "extent already loaded"
            );
            return None;
        }
        self.loaded.insert(&extent, resolution);
        Some(extent)
    }

    /// Plan a load for `extent` and issue the query when needed.
    pub fn load_extent(
        &mut self,
        extent: Extent,
        resolution: f64,
        projection: &str,
        sync: &RemoteSync,
    ) -> bool {
        let Some(extent) = self.plan_load(extent, resolution) else {
            return false;
        };
        debug!(rect = %extent.query_value(), resolution, "loading extent");
        sync.select(extent, projection);
        true
    }

    #[cfg(test)]
    pub fn loaded_extents(&self) -> impl Iterator<Item = Extent> + '_ {
        self.loaded.iter().map(|(extent, _)| extent)
    }

    /// Forget loaded extents so the next view change queries again.
    pub fn clear_loaded_extents(&mut self) {
        self.loaded.clear();
    }

    /// Merge the outcome of a finished extent query. Failures are logged and
    /// add nothing; the extent stays marked as loaded.
    pub fn apply_loaded(&mut self, result: LoadResult) -> usize {
        match result.outcome {
            Ok(features) => {
                let received = features.len();
                let added = self.add_features(features).len();
                debug!(
                    rect = %result.extent.query_value(),
                    received, added, "extent loaded"
                );
                added
            }
            Err(err) => {
                warn!(rect = %result.extent.query_value(), %err, "extent load failed");
                0
            }
        }
    }

    /// Topmost feature within `tolerance` map units of `at`.
    pub fn feature_at(&self, at: Coord, tolerance: f64) -> Option<FeatureKey> {
        self.features_near(at, tolerance)
            .into_iter()
            .rev()
            .find(|(_, f)| hits(&f.geometry, at, tolerance))
            .map(|(key, _)| key)
    }

    /// Log every loaded feature as GeoJSON.
    pub fn dump(&self) {
        info!(count = self.len(), "feature dump");
        for (key, feature) in self.features() {
            info!(%key, feature = %crate::codec::write_feature(feature));
        }
    }
}

fn hits(geometry: &Geometry, at: Coord, tolerance: f64) -> bool {
    let tol_sq = tolerance * tolerance;
    match geometry {
        Geometry::Point(c) => c.distance_sq(at) <= tol_sq,
        Geometry::LineString(_) => near_any_segment(geometry, at, tol_sq),
        Geometry::Polygon(rings) => {
            near_any_segment(geometry, at, tol_sq)
                || (rings.first().is_some_and(|outer| ring_contains(outer, at))
                    && !rings.iter().skip(1).any(|hole| ring_contains(hole, at)))
        }
    }
}

fn near_any_segment(geometry: &Geometry, at: Coord, tol_sq: f64) -> bool {
    geometry
        .segments()
        .into_iter()
        .any(|(_, a, b)| at.closest_on_segment(a, b).distance_sq(at) <= tol_sq)
}

// Even-odd ray casting.
fn ring_contains(ring: &[Coord], at: Coord) -> bool {
    let mut inside = false;
    for w in ring.windows(2) {
        let (a, b) = (w[0], w[1]);
        if (a.y > at.y) != (b.y > at.y) {
            let x_cross = (b.x - a.x) * (at.y - a.y) / (b.y - a.y) + a.x;
            if at.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}
