use super::{LoadResult, SyncError, SyncRequest, Transport};
use crate::codec::read_features;
use crate::model::Feature;
use anyhow::Context as _;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use std::sync::mpsc::Sender;
use tokio::runtime::Runtime;
use tracing::{debug, error, warn};

/// reqwest transport. Each request is an independent task on a runtime owned
/// by the transport: unordered, never cancelled, no timeout, no retry.
pub struct HttpTransport {
    runtime: Runtime,
    client: Client,
    loaded_tx: Sender<LoadResult>,
    repaint: Option<egui::Context>,
}

impl HttpTransport {
    /// Extent query results are sent to `loaded_tx`; `repaint` is poked when
    /// one arrives so the UI drains the channel promptly.
    pub fn new(
        loaded_tx: Sender<LoadResult>,
        repaint: Option<egui::Context>,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mapedit-sync")
            .enable_all()
            .build()
            .context("Failed to start the sync runtime")?;
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            runtime,
            client,
            loaded_tx,
            repaint,
        })
    }
}

impl Transport for HttpTransport {
    fn submit(&self, request: SyncRequest) {
        let client = self.client.clone();
        debug!(method = request.method(), url = request.url(), "submitting");
        match request {
            SyncRequest::Select { url, extent } => {
                let tx = self.loaded_tx.clone();
                let repaint = self.repaint.clone();
                self.runtime.spawn(async move {
                    let outcome = fetch_features(&client, &url).await;
                    if let Err(err) = &outcome {
                        log_failure("GET", &url, err);
                    }
                    // The UI may already be gone; nothing to do then.
                    let _ = tx.send(LoadResult { extent, outcome });
                    if let Some(ctx) = repaint {
                        ctx.request_repaint();
                    }
                });
            }
            SyncRequest::Mutate { op, url, id, body } => {
                self.runtime.spawn(async move {
                    match post_feature(&client, &url, body).await {
                        Ok(()) => debug!(op = op.path(), %id, "mutation stored"),
                        Err(err) => log_failure("POST", &url, &err),
                    }
                });
            }
        }
    }
}

async fn fetch_features(client: &Client, url: &str) -> Result<Vec<Feature>, SyncError> {
    let response = client.get(url).header(CACHE_CONTROL, "no-cache").send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Status {
            status: status.as_u16(),
            body: truncate(&body),
        });
    }
    let text = response.text().await?;
    read_features(&text).map_err(|err| SyncError::Decode(format!("{err:#}")))
}

async fn post_feature(client: &Client, url: &str, body: String) -> Result<(), SyncError> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .header(CACHE_CONTROL, "no-cache")
        .body(body)
        .send()
        .await?;
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Status {
        status: status.as_u16(),
        body: truncate(&body),
    })
}

fn log_failure(method: &str, url: &str, err: &SyncError) {
    match err {
        SyncError::Transport(_) => error!(method, url, %err, "request did not complete"),
        SyncError::Status { .. } | SyncError::Decode(_) => {
            warn!(method, url, %err, "request rejected");
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
