//! Download analytics
//!
//! Records that a download happened. Strictly fire-and-forget: failures are
//! logged at debug level and never reach the user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// What was downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadKind {
    Android,
    PcAgent,
}

impl DownloadKind {
    /// Confirmation shown to the user once the download starts
    pub fn notice(self) -> &'static str {
        match self {
            DownloadKind::Android => "Android app download started. Check your downloads folder.",
            DownloadKind::PcAgent => {
                "PC agent download started. Run the installer after download completes."
            }
        }
    }
}

/// Beacon payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEvent {
    #[serde(rename = "type")]
    pub kind: DownloadKind,
    pub timestamp: DateTime<Utc>,
    pub page: String,
}

impl DownloadEvent {
    pub fn now(kind: DownloadKind, page: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            page: page.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Analytics request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Analytics endpoint answered {0}")]
    Status(reqwest::StatusCode),
}

/// Destination for analytics events
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: &DownloadEvent) -> Result<(), AnalyticsError>;
}

/// Posts events as JSON to a collector endpoint
pub struct HttpAnalytics {
    client: Client,
    endpoint: String,
}

impl HttpAnalytics {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AnalyticsError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalytics {
    async fn record(&self, event: &DownloadEvent) -> Result<(), AnalyticsError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;
        if !response.status().is_success() {
            return Err(AnalyticsError::Status(response.status()));
        }
        Ok(())
    }
}

/// Writes events to the log only
pub struct LogAnalytics;

#[async_trait]
impl AnalyticsSink for LogAnalytics {
    async fn record(&self, event: &DownloadEvent) -> Result<(), AnalyticsError> {
        tracing::info!(
            kind = ?event.kind,
            page = %event.page,
            timestamp = %event.timestamp.to_rfc3339(),
            "Download recorded"
        );
        Ok(())
    }
}

/// Record a download in the background and return the notice for the user
pub fn track_download(
    sink: Arc<dyn AnalyticsSink>,
    kind: DownloadKind,
    page: impl Into<String>,
) -> &'static str {
    let event = DownloadEvent::now(kind, page);
    tokio::spawn(async move {
        if let Err(e) = sink.record(&event).await {
            tracing::debug!(error = %e, kind = ?event.kind, "Download tracking failed");
        }
    });
    kind.notice()
}
