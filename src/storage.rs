use std::error::Error;
use std::fmt;

use reqwest::StatusCode;
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

const KEY_PREFIX: &str = "blog-output";

/// Derives a collision-resistant object key: full UTC date and time plus a
/// random hex suffix, so same-second requests do not overwrite each other.
pub fn object_key() -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    format!("{KEY_PREFIX}/{stamp}-{:08x}.txt", rand::random::<u32>())
}

#[derive(Debug)]
pub enum StoreError {
    Timeout,
    Request(reqwest::Error),
    UpstreamStatus { status: StatusCode, body: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "object store request timed out"),
            Self::Request(err) => write!(f, "failed to reach object store: {err}"),
            Self::UpstreamStatus { status, body } => {
                write!(f, "object store returned {status}: {}", body.trim())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            _ => None,
        }
    }
}

/// Writes generated blogs into a bucket, addressed path-style as
/// `{endpoint}/{bucket}/{key}`.
pub struct BlogStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    timeout_ms: u64,
}

impl BlogStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.storage_endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn put(&self, key: &str, content: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        let response = timeout(
            Duration::from_millis(self.timeout_ms),
            self.http.put(&url).body(content.to_owned()).send(),
        )
        .await
        .map_err(|_| StoreError::Timeout)?
        .map_err(StoreError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::UpstreamStatus { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_has_prefix_and_extension() {
        let key = object_key();
        assert!(key.starts_with("blog-output/"));
        assert!(key.ends_with(".txt"));
    }

    #[test]
    fn object_key_embeds_date_time_and_suffix() {
        // blog-output/YYYYMMDD-HHMMSS-xxxxxxxx.txt
        let key = object_key();
        let name = key.strip_prefix("blog-output/").unwrap();
        let name = name.strip_suffix(".txt").unwrap();
        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn object_keys_are_unique_within_a_second() {
        assert_ne!(object_key(), object_key());
    }
}
