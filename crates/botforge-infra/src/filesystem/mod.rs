//! Filesystem helpers: data directory resolution and PDF uploads.

use std::path::{Path, PathBuf};

use botforge_types::knowledge::PdfUpload;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOTFORGE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BOTFORGE_DATA_DIR` environment variable
/// 2. `~/.botforge`
/// 3. `.botforge` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botforge");
    }

    PathBuf::from(".botforge")
}

/// Read a local file for upload to the knowledge service.
///
/// The extension check happens in the lifecycle service, so any readable
/// file is returned here.
pub async fn read_pdf(path: &Path) -> Result<PdfUpload, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(PdfUpload::new(file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_pdf_keeps_file_name_and_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Catalog.PDF");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let upload = read_pdf(&path).await.unwrap();
        assert_eq!(upload.file_name, "Catalog.PDF");
        assert_eq!(upload.bytes, b"%PDF-1.7");
        assert!(upload.has_pdf_extension());
    }

    #[tokio::test]
    async fn test_read_pdf_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_pdf(&dir.path().join("absent.pdf")).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_data_dir_is_not_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }
}
