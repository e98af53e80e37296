use anyhow::{bail, Context, Result};

/// Default resume size ceiling: 3 MB.
pub const DEFAULT_RESUME_MAX_BYTES: u64 = 3 * 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Multipart POST to the portal's file-storage endpoint.
    Http { endpoint: String },
    /// Direct `put_object` into an S3-compatible bucket.
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

/// Client configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub storage: StorageBackend,
    pub resume_max_bytes: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let api_url = require("PORTAL_API_URL")?
            .trim_end_matches('/')
            .to_string();

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "http".to_string());
        let storage = match backend.to_ascii_lowercase().as_str() {
            "http" => StorageBackend::Http {
                endpoint: lookup("FILE_STORAGE_URL")
                    .unwrap_or_else(|| format!("{api_url}/file-storage")),
            },
            "s3" => StorageBackend::S3(S3Settings {
                bucket: require("S3_BUCKET")?,
                endpoint: require("S3_ENDPOINT")?,
                public_url: require("S3_PUBLIC_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
                aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            }),
            other => bail!("STORAGE_BACKEND must be 'http' or 's3', got '{other}'"),
        };

        Ok(Config {
            api_url,
            storage,
            resume_max_bytes: lookup("RESUME_MAX_BYTES")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("RESUME_MAX_BYTES must be a positive integer")?
                .unwrap_or(DEFAULT_RESUME_MAX_BYTES),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_http_storage() {
        let config =
            Config::from_lookup(lookup_from(&[("PORTAL_API_URL", "http://localhost:3000/api/")]))
                .unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(
            config.storage,
            StorageBackend::Http {
                endpoint: "http://localhost:3000/api/file-storage".to_string()
            }
        );
        assert_eq!(config.resume_max_bytes, DEFAULT_RESUME_MAX_BYTES);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_url_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("PORTAL_API_URL"));
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORTAL_API_URL", "http://localhost:3000/api"),
            ("STORAGE_BACKEND", "s3"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_invalid_max_bytes_fails() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORTAL_API_URL", "http://localhost:3000/api"),
            ("RESUME_MAX_BYTES", "three"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("RESUME_MAX_BYTES"));
    }
}
