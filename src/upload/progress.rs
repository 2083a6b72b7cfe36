//! Upload item state and progress-reporting request bodies.

use futures_util::StreamExt;
use serde::Serialize;
use uuid::Uuid;

use crate::upload::validate::ImageFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Success => "success",
            UploadStatus::Error => "error",
        }
    }
}

/// One file in a bulk upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadItem {
    pub id: Uuid,
    pub file: ImageFile,
    /// 0..=100
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    pub url: Option<String>,
}

impl UploadItem {
    pub fn new(file: ImageFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
            url: None,
        }
    }

    pub fn apply(&mut self, update: &ItemUpdate) {
        self.progress = update.progress;
        self.status = update.status;
        self.error.clone_from(&update.error);
        self.url.clone_from(&update.url);
    }
}

/// State snapshot emitted by the task uploading an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: Uuid,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    pub url: Option<String>,
}

impl ItemUpdate {
    pub fn uploading(id: Uuid, progress: u8) -> Self {
        Self {
            id,
            progress,
            status: UploadStatus::Uploading,
            error: None,
            url: None,
        }
    }

    pub fn success(id: Uuid, url: String) -> Self {
        Self {
            id,
            progress: 100,
            status: UploadStatus::Success,
            error: None,
            url: Some(url),
        }
    }

    pub fn failed(id: Uuid, progress: u8, error: &str) -> Self {
        Self {
            id,
            progress,
            status: UploadStatus::Error,
            error: Some(error.to_string()),
            url: None,
        }
    }
}

/// Whole-number percentage of `sent` over `total`. An empty body is complete.
pub fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) * 100) / total) as u8
}

/// Stream `file` in `chunk_size` pieces, calling `on_progress` as each piece
/// is handed to the transport.
pub fn progress_body<P>(file: &ImageFile, chunk_size: usize, on_progress: P) -> reqwest::Body
where
    P: Fn(u8) + Send + 'static,
{
    let total = file.bytes.len();
    let chunks: Vec<Vec<u8>> = file
        .bytes
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    let mut sent = 0usize;
    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len();
        on_progress(percent(sent, total));
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(199, 200), 99);
        assert_eq!(percent(400, 200), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn test_apply_update() {
        let mut item = UploadItem::new(ImageFile::new("a.png", vec![1, 2, 3]));
        assert_eq!(item.status, UploadStatus::Pending);

        item.apply(&ItemUpdate::uploading(item.id, 40));
        assert_eq!((item.status, item.progress), (UploadStatus::Uploading, 40));

        item.apply(&ItemUpdate::failed(item.id, 40, "Network error"));
        assert_eq!(item.status, UploadStatus::Error);
        assert_eq!(item.error.as_deref(), Some("Network error"));
        assert_eq!(item.progress, 40);

        item.apply(&ItemUpdate::success(item.id, "/u/a.png".into()));
        assert_eq!(item.progress, 100);
        assert_eq!(item.error, None);
        assert_eq!(item.url.as_deref(), Some("/u/a.png"));
    }
}
