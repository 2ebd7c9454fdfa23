//! Local-disk [`FileUploader`]. Files are written under the configured
//! upload directory and served back by the router at the public base path.

use std::path::PathBuf;

use async_trait::async_trait;
use folio_core::upload::{stored_file_name, FileUploader, UploadError};

use crate::config::UploadConfig;

pub struct LocalDiskUploader {
    dir: PathBuf,
    public_base: String,
}

impl LocalDiskUploader {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            public_base: config.public_base.clone(),
        }
    }
}

#[async_trait]
impl FileUploader for LocalDiskUploader {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError> {
        let name = stored_file_name(file_name, chrono::Utc::now().timestamp_millis());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Transient(e.to_string()))?;
        tokio::fs::write(self.dir.join(&name), &bytes)
            .await
            .map_err(|e| UploadError::Transient(e.to_string()))?;

        tracing::info!(
            file = %name,
            content_type,
            size = bytes.len(),
            "Upload stored",
        );

        Ok(format!("{}/{name}", self.public_base))
    }
}
