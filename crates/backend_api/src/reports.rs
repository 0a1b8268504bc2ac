use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{ApiError, Result};

/// Access to the report workbooks produced by earlier calculations.
/// This abstraction allows swapping the local directory for another store.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Directory the pipeline writes new reports into.
    fn output_dir(&self) -> &Path;

    async fn fetch_report(&self, file_name: &str) -> Result<Vec<u8>>;
}

/// Reports kept as plain files in one output directory.
pub struct FileReportStore {
    output_dir: PathBuf,
}

impl FileReportStore {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn fetch_report(&self, file_name: &str) -> Result<Vec<u8>> {
        let name = sanitize_file_name(file_name)
            .ok_or_else(|| ApiError::ReportNotFound(file_name.to_string()))?;

        match tokio::fs::read(self.output_dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ApiError::ReportNotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A bare file name inside the output directory: no separators, no parent
/// references and no hidden (or in-progress `.partial`) files.
pub fn sanitize_file_name(raw: &str) -> Option<&str> {
    let name = raw.trim();
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0', ':']);
    valid.then_some(name)
}

/// Upload names reduced to ASCII letters, digits, `.`, `-` and `_`, keeping
/// the extension so the reader can still pick the format.
pub fn upload_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload.xlsx".to_string()
    } else {
        cleaned.to_string()
    }
}
