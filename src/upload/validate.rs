//! Image file checks run before any upload.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const MB: u64 = 1024 * 1024;

/// An image read into memory for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk. The content type comes from the extension.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Inline `data:` URL of the file contents.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Content type for a file name, by extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Why a file was refused before upload. Messages are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please select an image file (JPG, PNG, GIF, etc.)")]
    NotAnImage { name: String },

    #[error("Please select an image smaller than {max_mb}MB")]
    PictureTooLarge { name: String, max_mb: u64 },

    #[error("Maximum {max} files allowed")]
    TooManyFiles { max: usize },

    #[error("{name}: Please select one of: {accepted}")]
    UnsupportedType { name: String, accepted: String },

    #[error("{name}: Please select a file smaller than {max_mb}MB")]
    TooLarge { name: String, max_mb: u64 },
}

impl UploadRejection {
    /// Short heading for the notification.
    pub fn title(&self) -> &'static str {
        match self {
            UploadRejection::NotAnImage { .. } | UploadRejection::UnsupportedType { .. } => {
                "Invalid file type"
            }
            UploadRejection::PictureTooLarge { .. } | UploadRejection::TooLarge { .. } => {
                "File too large"
            }
            UploadRejection::TooManyFiles { .. } => "Too many files",
        }
    }
}

/// Check a profile picture: any `image/*` type up to `max_mb`.
pub fn validate_picture(file: &ImageFile, max_mb: u64) -> Result<(), UploadRejection> {
    if !file.is_image() {
        return Err(UploadRejection::NotAnImage {
            name: file.name.clone(),
        });
    }
    if file.size() > max_mb * MB {
        return Err(UploadRejection::PictureTooLarge {
            name: file.name.clone(),
            max_mb,
        });
    }
    Ok(())
}

/// Check a bulk upload file against an explicit type list and size cap.
pub fn validate_bulk_file(
    file: &ImageFile,
    accepted: &[String],
    max_mb: u64,
) -> Result<(), UploadRejection> {
    if !accepted.iter().any(|t| *t == file.content_type) {
        return Err(UploadRejection::UnsupportedType {
            name: file.name.clone(),
            accepted: accepted_label(accepted),
        });
    }
    if file.size() > max_mb * MB {
        return Err(UploadRejection::TooLarge {
            name: file.name.clone(),
            max_mb,
        });
    }
    Ok(())
}

/// "jpeg, png, gif" from "image/jpeg", "image/png", "image/gif".
pub fn accepted_label(accepted: &[String]) -> String {
    accepted
        .iter()
        .map(|t| t.split_once('/').map(|(_, sub)| sub).unwrap_or(t))
        .collect::<Vec<_>>()
        .join(", ")
}
