use super::Geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque feature identifier. The service may hand out strings or numbers;
/// both are kept verbatim so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(serde_json::Number),
}

impl FeatureId {
    /// Fresh client-side identifier (UUID v4).
    pub fn generate() -> Self {
        Self::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Local handle for a feature held by the feature source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(pub(crate) u64);

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A geometry with an identifier and free-form properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// `None` until the feature is first saved.
    pub id: Option<FeatureId>,
    pub geometry: Geometry,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id_label(&self) -> String {
        self.id
            .as_ref()
            .map_or_else(|| "<no id>".to_string(), ToString::to_string)
    }
}
