use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::PortalError;
use crate::storage::{FileStorage, FileUpload};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Uploads through the portal's file-storage endpoint as `multipart/form-data`
/// with a `key` field and a `file` part.
#[derive(Clone)]
pub struct HttpFileStorage {
    client: Client,
    endpoint: String,
}

impl HttpFileStorage {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PortalError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl FileStorage for HttpFileStorage {
    async fn upload(&self, key: &str, file: &FileUpload) -> Result<String, PortalError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().text("key", key.to_string()).part("file", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("File upload to {} failed with {status}: {body}", self.endpoint);
            return Err(PortalError::Storage(format!(
                "upload endpoint returned {status}"
            )));
        }

        let UploadResponse { url } = response.json().await?;
        info!("Uploaded {} ({} bytes) to {url}", file.name, file.size());
        Ok(url)
    }
}
