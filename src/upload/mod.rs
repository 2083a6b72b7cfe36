//! Image upload subsystem.
//!
//! # Data Flow
//! ```text
//! file on disk → validate.rs (type, size) → ImageFile
//!     → transport.rs (multipart, chunked body) → progress.rs (percent callbacks)
//!     → bulk.rs (concurrent fan-out, item state, summary)
//! ```
//!
//! # Design Decisions
//! - Files are checked locally before any request is made
//! - Each bulk item owns its transport; items never share a request
//! - Upload bodies are streamed, so uploads are not retried

pub mod bulk;
pub mod progress;
pub mod transport;
pub mod validate;

pub use bulk::{BulkUpload, UploadSummary};
pub use progress::{ItemUpdate, UploadItem, UploadStatus};
pub use transport::{extract_url, Uploader, PICTURE_URL_KEYS};
pub use validate::{validate_bulk_file, validate_picture, ImageFile, UploadRejection};
