use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::error::FetchError;

/// Source dataset: branch offices and phone numbers, datos.gob.cl.
pub const CSV_URL: &str =
    "https://datos.gob.cl/uploads/recursos/oficinasTelefonosSucursales.csv";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetched payloads are reused for this long before a re-download.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// HTTP client abstraction for dependency injection.
pub trait HttpClient {
    /// Perform a GET request and return the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production client using blocking reqwest. The fetch runs on the UI
/// thread and blocks until completion or the 30 s timeout.
#[derive(Debug, Default)]
pub struct ReqwestClient;

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let response = client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else if e.is_connect() {
                FetchError::Connect(url.to_string())
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|body| body.to_vec())
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// FetchCache – per-URL payload cache with time-based expiry
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CacheEntry {
    body: Vec<u8>,
    fetched_at: Instant,
}

/// Explicit per-URL cache owned by the pipeline orchestrator. Invalidation
/// is time-based only; repeated filter interactions within the TTL never
/// re-issue the request.
#[derive(Debug)]
pub struct FetchCache {
    entries: BTreeMap<String, CacheEntry>,
    ttl: Duration,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        FetchCache {
            entries: BTreeMap::new(),
            ttl,
        }
    }

    /// Return the body for `url`, fetching through `client` on a miss or
    /// an expired entry. Errors are not cached: the next call retries.
    pub fn fetch(
        &mut self,
        url: &str,
        client: &impl HttpClient,
    ) -> Result<Vec<u8>, FetchError> {
        if let Some(entry) = self.entries.get(url) {
            if entry.fetched_at.elapsed() < self.ttl {
                log::debug!("cache hit for {url}");
                return Ok(entry.body.clone());
            }
        }

        let body = client.get(url)?;
        self.entries.insert(
            url.to_string(),
            CacheEntry {
                body: body.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Mock client recording how often the network was hit.
    struct MockClient {
        body: Option<Vec<u8>>,
        call_count: AtomicUsize,
    }

    impl MockClient {
        fn success(body: &[u8]) -> Self {
            MockClient {
                body: Some(body.to_vec()),
                call_count: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            MockClient {
                body: None,
                call_count: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for MockClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.body.clone().ok_or_else(|| FetchError::Connect(url.to_string()))
        }
    }

    #[test]
    fn repeated_fetch_within_ttl_hits_the_cache() {
        let client = MockClient::success(b"Region,Comuna\nA,B\n");
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        let first = cache.fetch("http://example/x.csv", &client).unwrap();
        let second = cache.fetch("http://example/x.csv", &client).unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let client = MockClient::success(b"payload");
        let mut cache = FetchCache::new(Duration::ZERO);

        cache.fetch("http://example/x.csv", &client).unwrap();
        cache.fetch("http://example/x.csv", &client).unwrap();

        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn distinct_urls_get_distinct_entries() {
        let client = MockClient::success(b"payload");
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        cache.fetch("http://example/a.csv", &client).unwrap();
        cache.fetch("http://example/b.csv", &client).unwrap();
        cache.fetch("http://example/a.csv", &client).unwrap();

        assert_eq!(client.calls(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let failing = MockClient::failing();
        let mut cache = FetchCache::new(Duration::from_secs(3600));

        assert!(cache.fetch("http://example/x.csv", &failing).is_err());
        assert_eq!(failing.calls(), 1);

        // A later successful client is consulted: nothing was cached.
        let ok = MockClient::success(b"payload");
        let body = cache.fetch("http://example/x.csv", &ok).unwrap();
        assert_eq!(body, b"payload");
        assert_eq!(ok.calls(), 1);
    }
}
