use std::sync::Arc;

use tracing::info;

use crate::api::http::HttpPortalApi;
use crate::api::PortalApi;
use crate::cache::QueryCache;
use crate::config::{Config, StorageBackend};
use crate::errors::PortalError;
use crate::storage::http::HttpFileStorage;
use crate::storage::s3::S3FileStorage;
use crate::storage::FileStorage;

/// Shared client state handed to every page flow.
#[derive(Clone)]
pub struct PortalState {
    pub api: Arc<dyn PortalApi>,
    /// Upload backend. Default: HttpFileStorage. Swap via STORAGE_BACKEND.
    pub storage: Arc<dyn FileStorage>,
    pub cache: QueryCache,
    pub resume_max_bytes: u64,
}

impl PortalState {
    pub fn new(
        api: Arc<dyn PortalApi>,
        storage: Arc<dyn FileStorage>,
        resume_max_bytes: u64,
    ) -> Self {
        Self {
            api,
            storage,
            cache: QueryCache::new(),
            resume_max_bytes,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, PortalError> {
        let api = HttpPortalApi::new(&config.api_url)?;
        info!("Portal API client initialized ({})", api.base_url());

        let storage: Arc<dyn FileStorage> = match &config.storage {
            StorageBackend::Http { endpoint } => {
                info!("File storage: HTTP upload endpoint {endpoint}");
                Arc::new(HttpFileStorage::new(endpoint.as_str())?)
            }
            StorageBackend::S3(settings) => {
                info!("File storage: S3 bucket {}", settings.bucket);
                Arc::new(S3FileStorage::connect(settings).await)
            }
        };

        Ok(Self::new(Arc::new(api), storage, config.resume_max_bytes))
    }
}
