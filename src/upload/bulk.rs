//! Bulk upload: select many files, upload them concurrently, report progress.
//!
//! # Data Flow
//! ```text
//! select(files) → validate each → UploadItem (pending)
//! upload_all:
//!     one future per pending item (join_all) ──ItemUpdate──▶ mpsc channel
//!     caller side drains the channel and applies snapshots to the item list
//!     results (in item order) → UploadSummary
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{ClientError, ErrorClass};
use crate::observability::metrics;
use crate::upload::progress::{ItemUpdate, UploadItem, UploadStatus};
use crate::upload::transport::{extract_url, Uploader};
use crate::upload::validate::{validate_bulk_file, ImageFile, UploadRejection};

/// Result of one `upload_all` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// URLs of the successful uploads, in item order.
    pub urls: Vec<String>,
    /// Items that were pending when the run started.
    pub attempted: usize,
}

impl UploadSummary {
    pub fn succeeded(&self) -> usize {
        self.urls.len()
    }

    pub fn message(&self) -> String {
        format!(
            "{} of {} files uploaded successfully",
            self.succeeded(),
            self.attempted
        )
    }
}

/// A bulk upload session against one endpoint.
#[derive(Debug)]
pub struct BulkUpload {
    uploader: Uploader,
    endpoint: String,
    token: Option<String>,
    limits: UploadConfig,
    items: Vec<UploadItem>,
}

impl BulkUpload {
    pub fn new(uploader: Uploader, endpoint: impl Into<String>, limits: UploadConfig) -> Self {
        Self {
            uploader,
            endpoint: endpoint.into(),
            token: None,
            limits,
            items: Vec::new(),
        }
    }

    /// Send a bearer token with every upload.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn pending(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == UploadStatus::Pending)
            .count()
    }

    /// Add files to the list.
    ///
    /// A selection that would exceed `max_files` is refused as a whole.
    /// Otherwise each file that fails the type or size check is skipped and
    /// its rejection returned.
    pub fn select(&mut self, files: Vec<ImageFile>) -> Result<Vec<UploadRejection>, UploadRejection> {
        if self.items.len() + files.len() > self.limits.max_files {
            return Err(UploadRejection::TooManyFiles {
                max: self.limits.max_files,
            });
        }

        let mut rejected = Vec::new();
        for file in files {
            match validate_bulk_file(&file, &self.limits.accepted_types, self.limits.max_size_mb) {
                Ok(()) => self.items.push(UploadItem::new(file)),
                Err(rejection) => {
                    tracing::warn!(file = %file.name, reason = %rejection, "File rejected");
                    rejected.push(rejection);
                }
            }
        }
        Ok(rejected)
    }

    /// Drop a pending item. Items already uploaded or failed stay.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items
            .retain(|i| !(i.id == id && i.status == UploadStatus::Pending));
        self.items.len() != before
    }

    pub async fn upload_all(&mut self) -> UploadSummary {
        self.upload_all_with(|_| {}).await
    }

    /// Upload every pending item concurrently. `observe` sees each item after
    /// every state change.
    pub async fn upload_all_with<F>(&mut self, mut observe: F) -> UploadSummary
    where
        F: FnMut(&UploadItem),
    {
        let pending: Vec<(Uuid, ImageFile)> = self
            .items
            .iter()
            .filter(|i| i.status == UploadStatus::Pending)
            .map(|i| (i.id, i.file.clone()))
            .collect();
        let attempted = pending.len();
        if attempted == 0 {
            return UploadSummary {
                urls: Vec::new(),
                attempted,
            };
        }

        tracing::info!(endpoint = %self.endpoint, files = attempted, "Starting bulk upload");

        let (tx, mut rx) = mpsc::unbounded_channel::<ItemUpdate>();
        let uploads = pending.into_iter().map(|(id, file)| {
            let uploader = self.uploader.clone();
            let endpoint = self.endpoint.clone();
            let token = self.token.clone();
            let tx = tx.clone();
            async move { upload_one(uploader, endpoint, token, id, file, tx).await }
        });
        let fan_out = join_all(uploads);
        drop(tx);

        let items = &mut self.items;
        let drain = async {
            while let Some(update) = rx.recv().await {
                if let Some(item) = items.iter_mut().find(|i| i.id == update.id) {
                    item.apply(&update);
                    observe(item);
                }
            }
        };

        let (results, ()) = tokio::join!(fan_out, drain);
        let summary = UploadSummary {
            urls: results.into_iter().flatten().collect(),
            attempted,
        };
        tracing::info!(
            succeeded = summary.succeeded(),
            attempted = summary.attempted,
            "Bulk upload finished"
        );
        summary
    }
}

async fn upload_one(
    uploader: Uploader,
    endpoint: String,
    token: Option<String>,
    id: Uuid,
    file: ImageFile,
    tx: mpsc::UnboundedSender<ItemUpdate>,
) -> Option<String> {
    let _ = tx.send(ItemUpdate::uploading(id, 0));

    let last_progress = Arc::new(AtomicU8::new(0));
    let progress_tx = tx.clone();
    let progress = last_progress.clone();
    let result = uploader
        .send(&endpoint, "file", &file, token.as_deref(), move |p| {
            progress.store(p, Ordering::Relaxed);
            let _ = progress_tx.send(ItemUpdate::uploading(id, p));
        })
        .await;

    let at = last_progress.load(Ordering::Relaxed);
    let update = match result {
        Ok(reply) => match extract_url(&reply, &["url"]) {
            Some(url) => ItemUpdate::success(id, url),
            None => ItemUpdate::failed(id, at, "Invalid response"),
        },
        Err(e) => {
            tracing::warn!(file = %file.name, error = %e, "Upload failed");
            ItemUpdate::failed(id, at, item_error(&e))
        }
    };

    metrics::record_upload(update.status.as_str());
    let url = update.url.clone();
    let _ = tx.send(update);
    url
}

/// Per-item error text.
fn item_error(err: &ClientError) -> &'static str {
    match err.class() {
        ErrorClass::Network => "Network error",
        ErrorClass::Parse => "Invalid response",
        ErrorClass::Http | ErrorClass::Client => "Upload failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(max_files: usize) -> BulkUpload {
        let limits = UploadConfig {
            max_files,
            ..UploadConfig::default()
        };
        let uploader = Uploader::new(reqwest::Client::new(), &limits);
        BulkUpload::new(uploader, "http://127.0.0.1:9/api/upload", limits)
    }

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, vec![0u8; 16])
    }

    #[test]
    fn test_select_rejects_whole_batch_over_limit() {
        let mut upload = bulk(2);
        upload.select(vec![png("a.png")]).unwrap();
        let err = upload.select(vec![png("b.png"), png("c.png")]).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 2 files allowed");
        assert_eq!(upload.items().len(), 1);
    }

    #[test]
    fn test_select_skips_invalid_files() {
        let mut upload = bulk(10);
        let rejected = upload
            .select(vec![png("a.png"), png("notes.txt"), png("b.gif")])
            .unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(
            rejected[0].to_string(),
            "notes.txt: Please select one of: jpeg, png, gif"
        );
        assert_eq!(upload.items().len(), 2);
        assert_eq!(upload.pending(), 2);
    }

    #[test]
    fn test_remove_pending_only() {
        let mut upload = bulk(10);
        upload.select(vec![png("a.png"), png("b.png")]).unwrap();
        let id = upload.items()[0].id;
        assert!(upload.remove(id));
        assert!(!upload.remove(id));
        assert_eq!(upload.items().len(), 1);
    }

    #[test]
    fn test_summary_message() {
        let summary = UploadSummary {
            urls: vec!["/a".into()],
            attempted: 3,
        };
        assert_eq!(summary.message(), "1 of 3 files uploaded successfully");
    }

    #[tokio::test]
    async fn test_nothing_pending() {
        let mut upload = bulk(10);
        let summary = upload.upload_all().await;
        assert_eq!(summary.attempted, 0);
        assert!(summary.urls.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_marks_items_failed() {
        let mut upload = bulk(10);
        upload.select(vec![png("a.png"), png("b.png")]).unwrap();
        let summary = upload.upload_all().await;

        assert_eq!(summary.attempted, 2);
        assert!(summary.urls.is_empty());
        for item in upload.items() {
            assert_eq!(item.status, UploadStatus::Error);
            assert_eq!(item.error.as_deref(), Some("Network error"));
        }
    }
}
