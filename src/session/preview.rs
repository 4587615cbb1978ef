//! Local preview handles with an explicit release contract.
//!
//! A preview is a locally-derived, revocable resource a renderer can load
//! while the backend processes the document. The handle is owned by the
//! document and must be revoked when the document is discarded or replaced;
//! `Drop` acts only as a backstop against leaks.

use crate::session::types::DocumentSource;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};

/// Revocable handle to a locally-derived document preview.
pub trait PreviewHandle: Send {
    /// Location a renderer can load the preview from.
    fn location(&self) -> &Path;

    /// Release the underlying resource.
    fn revoke(self: Box<Self>);
}

/// Platform primitive that derives preview handles from raw document bytes.
pub trait PreviewProvider: Send + Sync {
    /// Derive a preview for the supplied document.
    fn create(&self, source: &DocumentSource) -> std::io::Result<Box<dyn PreviewHandle>>;
}

/// Provider that materializes the document bytes into a temporary file.
pub struct TempFilePreview;

impl PreviewProvider for TempFilePreview {
    fn create(&self, source: &DocumentSource) -> std::io::Result<Box<dyn PreviewHandle>> {
        let suffix = Path::new(&source.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|extension| format!(".{extension}"));
        let mut builder = tempfile::Builder::new();
        builder.prefix("doculens-preview-");
        if let Some(suffix) = suffix.as_deref() {
            builder.suffix(suffix);
        }
        let mut file: NamedTempFile = builder.tempfile()?;
        file.write_all(&source.bytes)?;
        file.flush()?;

        Ok(Box::new(TempFileHandle {
            path: file.into_temp_path(),
        }))
    }
}

struct TempFileHandle {
    path: TempPath,
}

impl PreviewHandle for TempFileHandle {
    fn location(&self) -> &Path {
        &self.path
    }

    fn revoke(self: Box<Self>) {
        if let Err(err) = self.path.close() {
            tracing::warn!(error = %err, "Failed to remove preview file");
        }
    }
}
