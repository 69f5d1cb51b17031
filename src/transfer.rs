//! Spreadsheet import and export for an upgrade.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend, ExportRequest, ImportRequest};
use crate::models::VersionPair;
use crate::notice::{Notice, NoticeSlot};

/// Text of the download link appended to a successful export.
pub const DOWNLOAD_LINK_TEXT: &str = "Click here to download.";

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Upload clicked without a file; shown as a blocking alert.
    #[error("Select a file first")]
    NoFileSelected,
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Import/export buttons of the overview page and their shared message box.
#[derive(Debug, Clone)]
pub struct TransferController {
    pair: VersionPair,
    message: NoticeSlot,
}

impl TransferController {
    pub fn new(pair: VersionPair) -> Self {
        Self {
            pair,
            message: NoticeSlot::default(),
        }
    }

    /// Contents of the message box.
    pub fn message(&self, now: Instant) -> Option<&Notice> {
        self.message.visible(now)
    }

    fn report(&mut self, result: Result<Notice, ApiError>) -> Result<Notice, TransferError> {
        match result {
            Ok(notice) => {
                self.message.show(notice.clone(), Instant::now());
                Ok(notice)
            }
            Err(e) => {
                self.message.show(Notice::from_api_error(&e), Instant::now());
                Err(e.into())
            }
        }
    }

    /// Upload an already-read file.
    pub async fn import<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        file: Option<(String, Vec<u8>)>,
    ) -> Result<Notice, TransferError> {
        let (file_name, content) = file.ok_or(TransferError::NoFileSelected)?;
        debug!("Uploading {} ({} bytes) for {}", file_name, content.len(), self.pair);

        let request = ImportRequest {
            pair: self.pair.clone(),
            file_name,
            content,
        };
        let result = backend.import_file(&request).await.map(|response| {
            info!("Imported {} into {}", request.file_name, self.pair);
            Notice::success(response.message.unwrap_or_default())
        });
        if let Err(e) = &result {
            warn!("Import of {} failed: {}", request.file_name, e);
        }
        self.report(result)
    }

    /// Read `path` from disk and upload it.
    pub async fn import_path<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        path: Option<&Path>,
    ) -> Result<Notice, TransferError> {
        let path = path.ok_or(TransferError::NoFileSelected)?;
        let content = tokio::fs::read(path).await.map_err(|source| TransferError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.import(backend, Some((file_name, content))).await
    }

    /// Ask the backend for an export; the notice carries the download link.
    pub async fn export<B: Backend + ?Sized>(&mut self, backend: &B) -> Result<Notice, TransferError> {
        debug!("Requesting export for {}", self.pair);
        let result = backend
            .export_file(&ExportRequest::from(&self.pair))
            .await
            .map(|response| {
                Notice::success(response.message).with_link(response.download_url, DOWNLOAD_LINK_TEXT)
            });
        if let Err(e) = &result {
            warn!("Export for {} failed: {}", self.pair, e);
        }
        self.report(result)
    }
}
