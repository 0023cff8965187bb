//! Local storage for uploaded profile documents.

use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use z83_models::{AccountId, DocumentKind};

use crate::error::{ApiError, ApiResult};

/// Write `bytes` under `root/{account}/` and return the path relative to `root`.
///
/// File names are generated; the client-supplied name only contributes its
/// already-validated extension.
pub async fn save_document(
    root: &Path,
    account: AccountId,
    kind: DocumentKind,
    extension: &str,
    bytes: &[u8],
) -> ApiResult<String> {
    let relative = PathBuf::from(account.to_string())
        .join(format!("{}-{}.{}", kind, Uuid::new_v4(), extension));
    let full = root.join(&relative);

    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create upload dir: {}", e)))?;
    }

    tokio::fs::write(&full, bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;

    let relative = relative.to_string_lossy().replace('\\', "/");
    info!(account_id = %account, kind = %kind, path = %relative, size = bytes.len(), "Document stored");
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_document(dir.path(), AccountId(3), DocumentKind::Cv, "pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert!(path.starts_with("3/cv-"));
        assert!(path.ends_with(".pdf"));
        let written = tokio::fs::read(dir.path().join(&path)).await.unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }
}
