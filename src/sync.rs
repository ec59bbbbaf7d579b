//! Forwarding of local feature mutations and extent queries to the remote
//! feature service.
//!
//! Every call is fire and forget: the caller never waits, failures are
//! logged by the transport and never retried or rolled back.

mod http;
mod request;

pub use http::HttpTransport;
pub use request::{Mutation, SyncRequest};

use crate::model::{Extent, Feature};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// Outcome of an extent query, handed back to the UI thread.
#[derive(Debug)]
pub struct LoadResult {
    pub extent: Extent,
    pub outcome: Result<Vec<Feature>, SyncError>,
}

/// Sends requests without waiting for them.
pub trait Transport {
    fn submit(&self, request: SyncRequest);
}

/// Stand-in when no network runtime could be started: requests are logged
/// and dropped.
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn submit(&self, request: SyncRequest) {
        warn!(
            method = request.method(),
            url = request.url(),
            body_len = request.body().map_or(0, str::len),
            "offline, request dropped"
        );
    }
}

/// Translates feature mutations into service requests.
pub struct RemoteSync {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl RemoteSync {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        let mut sync = Self {
            base_url: String::new(),
            transport,
        };
        sync.set_base_url(base_url);
        sync
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` when the URL actually changed.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> bool {
        let trimmed = base_url.into().trim().trim_end_matches('/').to_string();
        if trimmed == self.base_url {
            return false;
        }
        self.base_url = trimmed;
        true
    }

    pub fn select(&self, extent: Extent, projection: &str) {
        self.transport
            .submit(SyncRequest::select(&self.base_url, extent, projection));
    }

    /// Insert a freshly drawn feature. Its id must already be assigned.
    pub fn create(&self, feature: &Feature) -> bool {
        if feature.id.is_none() {
            warn!("refusing to insert a feature without id");
            return false;
        }
        self.mutate(Mutation::Insert, feature)
    }

    /// Replace a feature remotely. Features never saved (no id) are skipped.
    pub fn replace(&self, feature: &Feature) -> bool {
        self.mutate(Mutation::Replace, feature)
    }

    /// Delete a feature remotely. Features never saved (no id) are skipped.
    pub fn delete(&self, feature: &Feature) -> bool {
        self.mutate(Mutation::Delete, feature)
    }

    fn mutate(&self, op: Mutation, feature: &Feature) -> bool {
        match SyncRequest::mutation(op, &self.base_url, feature) {
            Some(request) => {
                self.transport.submit(request);
                true
            }
            None => {
                debug!(op = op.path(), "no id for feature, nothing sent");
                false
            }
        }
    }
}
