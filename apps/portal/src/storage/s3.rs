use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::config::S3Settings;
use crate::errors::PortalError;
use crate::storage::{FileStorage, FileUpload};

/// Writes uploads directly into an S3-compatible bucket (MinIO locally, AWS in production).
#[derive(Clone)]
pub struct S3FileStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3FileStorage {
    pub async fn connect(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.aws_access_key_id,
            &settings.aws_secret_access_key,
            None,
            None,
            "portal-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&settings.endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: settings.bucket.clone(),
            public_url: settings.public_url.clone(),
        }
    }
}

/// Object key for an upload: `{key}/{uuid}-{sanitized file name}`.
pub fn object_key(key: &str, id: Uuid, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}/{id}-{sanitized}", key.trim_matches('/'))
}

#[async_trait]
impl FileStorage for S3FileStorage {
    async fn upload(&self, key: &str, file: &FileUpload) -> Result<String, PortalError> {
        let s3_key = object_key(key, Uuid::new_v4(), &file.name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&s3_key)
            .body(ByteStream::from(file.bytes.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| PortalError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {} to s3://{}/{}", file.name, self.bucket, s3_key);
        Ok(format!("{}/{}/{}", self.public_url, self.bucket, s3_key))
    }
}
