//! Conditional HTTP download cache
//!
//! Fetches URLs into a process-wide cache directory keyed by a sha256 of the
//! URL. Repeat fetches send `If-None-Match` / `If-Modified-Since` from the
//! stored metadata; a `304 Not Modified` short-circuits to the cached
//! content without touching the response body.

use futures::StreamExt;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;

/// Stored validators for one cached URL
///
/// Written only after the content file it references is in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Original URL (for diagnostics)
    pub url: String,
    /// `ETag` response header, if the server sent one
    pub etag: Option<String>,
    /// `Last-Modified` response header, if the server sent one
    pub last_modified: Option<String>,
}

/// HTTP client with a conditional-request download cache
#[derive(Debug, Clone)]
pub struct CachedClient {
    client: reqwest::Client,
    cache_dir: PathBuf,
}

impl CachedClient {
    /// Create a client caching under the given directory
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(300))
                .connect_timeout(Duration::from_secs(30))
                .user_agent(concat!("courseup/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache_dir,
        }
    }

    /// Cache directory in use
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Deterministic cache key for a URL (content-addressed by URL)
    pub fn cache_key(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Path of the cached content for a URL
    pub fn content_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(Self::cache_key(url))
    }

    fn meta_path(&self, url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.meta.json", Self::cache_key(url)))
    }

    /// Fetch a URL, reusing the cache via conditional-request semantics
    ///
    /// Returns the path of the cached content. Idempotent and safe to call
    /// repeatedly; an unchanged remote costs one header round-trip.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, DownloadError> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| DownloadError::Io {
                path: self.cache_dir.clone(),
                error: e.to_string(),
            })?;

        let content_path = self.content_path(url);
        let meta_path = self.meta_path(url);

        let mut request = self.client.get(url);
        // Attach validators only when the content they vouch for exists
        if content_path.exists() {
            if let Some(meta) = self.read_metadata(&meta_path) {
                if let Some(etag) = &meta.etag {
                    request = request.header(IF_NONE_MATCH, etag);
                }
                if let Some(last_modified) = &meta.last_modified {
                    request = request.header(IF_MODIFIED_SINCE, last_modified);
                }
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                // Some transports surface 304 as an error; the cache is
                // still valid in that case
                if e.status() == Some(StatusCode::NOT_MODIFIED) && content_path.exists() {
                    tracing::debug!("Not modified (304), using cache");
                    return Ok(content_path);
                }
                return Err(DownloadError::Network {
                    url: url.to_string(),
                    error: e.to_string(),
                });
            }
        };

        if response.status() == StatusCode::NOT_MODIFIED {
            tracing::debug!("Not modified, using cache");
            return Ok(content_path);
        }

        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        tracing::debug!(url, "Downloading");
        let etag = header_string(&response, ETAG);
        let last_modified = header_string(&response, LAST_MODIFIED);

        // Stream into a sibling temp file, rename over the content, and
        // only then write metadata; metadata must never reference content
        // that does not exist
        let partial_path = self.cache_dir.join(format!(
            "{}.part",
            Self::cache_key(url)
        ));
        let mut file = File::create(&partial_path)
            .await
            .map_err(|e| DownloadError::Io {
                path: partial_path.clone(),
                error: e.to_string(),
            })?;

        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::Io {
                    path: partial_path.clone(),
                    error: e.to_string(),
                })?;
        }
        file.flush().await.map_err(|e| DownloadError::Io {
            path: partial_path.clone(),
            error: e.to_string(),
        })?;
        drop(file);

        tokio::fs::rename(&partial_path, &content_path)
            .await
            .map_err(|e| DownloadError::Io {
                path: content_path.clone(),
                error: e.to_string(),
            })?;

        let meta = CacheMetadata {
            url: url.to_string(),
            etag,
            last_modified,
        };
        let body = serde_json::to_string(&meta).map_err(|e| DownloadError::Metadata {
            path: meta_path.clone(),
            error: e.to_string(),
        })?;
        tokio::fs::write(&meta_path, body)
            .await
            .map_err(|e| DownloadError::Io {
                path: meta_path.clone(),
                error: e.to_string(),
            })?;

        Ok(content_path)
    }

    /// Remove the whole cache directory
    pub fn clear(&self) -> Result<(), DownloadError> {
        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir).map_err(|e| DownloadError::Io {
                path: self.cache_dir.clone(),
                error: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn read_metadata(&self, meta_path: &Path) -> Option<CacheMetadata> {
        let body = std::fs::read_to_string(meta_path).ok()?;
        match serde_json::from_str(&body) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!(path = %meta_path.display(), error = %e, "Ignoring unreadable cache metadata");
                None
            }
        }
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(temp: &TempDir) -> CachedClient {
        CachedClient::new(temp.path().to_path_buf())
    }

    #[test]
    fn test_cache_key_is_stable() {
        let a = CachedClient::cache_key("https://example.com/a.zip");
        let b = CachedClient::cache_key("https://example.com/a.zip");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_cache_key_differs_per_url() {
        let a = CachedClient::cache_key("https://example.com/a.zip");
        let b = CachedClient::cache_key("https://example.com/b.zip");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_fetch_downloads_and_stores_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/archive.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"payload".to_vec())
                    .insert_header("ETag", "\"v1\"")
                    .insert_header("Last-Modified", "Mon, 01 Jan 2024 00:00:00 GMT"),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let client = client(&temp);
        let url = format!("{}/archive.zip", server.uri());

        let content = client.fetch(&url).await.unwrap();
        assert_eq!(std::fs::read(&content).unwrap(), b"payload");

        let meta_path = temp
            .path()
            .join(format!("{}.meta.json", CachedClient::cache_key(&url)));
        let meta: CacheMetadata =
            serde_json::from_str(&std::fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(meta.etag.as_deref(), Some("\"v1\""));
        assert_eq!(
            meta.last_modified.as_deref(),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
        assert_eq!(meta.url, url);
    }

    #[tokio::test]
    async fn test_fetch_short_circuits_on_304() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/archive.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"original".to_vec())
                    .insert_header("ETag", "\"v1\""),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/archive.zip"))
            .and(header("If-None-Match", "\"v1\""))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let client = client(&temp);
        let url = format!("{}/archive.zip", server.uri());

        let first = client.fetch(&url).await.unwrap();
        let bytes_before = std::fs::read(&first).unwrap();

        let second = client.fetch(&url).await.unwrap();
        assert_eq!(first, second);
        // 304 must not alter the cached content's bytes
        assert_eq!(std::fs::read(&second).unwrap(), bytes_before);
    }

    #[tokio::test]
    async fn test_fetch_replaces_content_when_etag_changes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/archive.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"version one".to_vec())
                    .insert_header("ETag", "\"v1\""),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/archive.zip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"version two".to_vec())
                    .insert_header("ETag", "\"v2\""),
            )
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let client = client(&temp);
        let url = format!("{}/archive.zip", server.uri());

        client.fetch(&url).await.unwrap();
        let content = client.fetch(&url).await.unwrap();

        assert_eq!(std::fs::read(&content).unwrap(), b"version two");
        let meta_path = temp
            .path()
            .join(format!("{}.meta.json", CachedClient::cache_key(&url)));
        let meta: CacheMetadata =
            serde_json::from_str(&std::fs::read_to_string(meta_path).unwrap()).unwrap();
        assert_eq!(meta.etag.as_deref(), Some("\"v2\""));
    }

    #[tokio::test]
    async fn test_fetch_propagates_http_failure_with_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let client = client(&temp);
        let url = format!("{}/missing.zip", server.uri());

        match client.fetch(&url).await {
            Err(DownloadError::HttpStatus { url: u, status }) => {
                assert_eq!(u, url);
                assert_eq!(status, 404);
            }
            other => panic!("Expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear_removes_cache_dir() {
        let temp = TempDir::new().unwrap();
        let cache_dir = temp.path().join("cache");
        let client = CachedClient::new(cache_dir.clone());
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("stale"), b"x").unwrap();

        client.clear().unwrap();
        assert!(!cache_dir.exists());
        // Clearing an already-absent cache is fine
        client.clear().unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Cache keys are deterministic and always 64 hex characters
        #[test]
        fn prop_cache_key_format(url in "[a-z]{3,10}://[a-z0-9./-]{1,40}") {
            let key = CachedClient::cache_key(&url);
            prop_assert_eq!(key.len(), 64);
            prop_assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
            prop_assert_eq!(key, CachedClient::cache_key(&url));
        }
    }
}
