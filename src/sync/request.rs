use crate::codec::write_feature;
use crate::model::{Extent, Feature, FeatureId};

/// Feature mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Insert,
    Replace,
    Delete,
}

impl Mutation {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Delete => "delete",
        }
    }
}

/// Fully resolved request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    Select {
        url: String,
        extent: Extent,
    },
    Mutate {
        op: Mutation,
        url: String,
        id: FeatureId,
        body: String,
    },
}

impl SyncRequest {
    /// `GET {base}/select?rect=minX,minY,maxX,maxY&proj=<code>`
    pub fn select(base_url: &str, extent: Extent, projection: &str) -> Self {
        Self::Select {
            url: format!(
                "{base_url}/select?rect={}&proj={projection}",
                extent.query_value()
            ),
            extent,
        }
    }

    /// `POST {base}/<op>` with the encoded feature, or `None` when the
    /// feature has no id.
    pub fn mutation(op: Mutation, base_url: &str, feature: &Feature) -> Option<Self> {
        let id = feature.id.clone()?;
        Some(Self::Mutate {
            op,
            url: format!("{base_url}/{}", op.path()),
            id,
            body: write_feature(feature),
        })
    }

    pub const fn method(&self) -> &'static str {
        match self {
            Self::Select { .. } => "GET",
            Self::Mutate { .. } => "POST",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Select { url, .. } | Self::Mutate { url, .. } => url,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Select { .. } => None,
            Self::Mutate { body, .. } => Some(body),
        }
    }
}
