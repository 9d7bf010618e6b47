// src/api/interceptor.rs
//! Request interception: serve recorded responses and observe real ones.
//!
//! The engine only knows the `RequestInterceptor` trait. `MemoryCache` is
//! the in-process implementation; its exchanges serialize with serde so a
//! caller can persist them however it likes and load them back later.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hook consulted before each request and told about each real response.
pub trait RequestInterceptor: Send + Sync {
    /// A previously recorded response body for this request, if any.
    fn try_read(&self, method: &str, url: &str, body: &str) -> Option<String>;

    /// Called with every successful response that came from the network.
    fn write(&self, method: &str, url: &str, body: &str, response: &str);
}

/// One recorded request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub method: String,
    pub url: String,
    pub body: String,
    pub response: String,
}

impl Exchange {
    /// Bodies match when they are equal as JSON, so key order and
    /// whitespace don't matter.
    fn matches(&self, method: &str, url: &str, body: &str) -> bool {
        self.method == method && self.url == url && bodies_equivalent(&self.body, body)
    }
}

fn bodies_equivalent(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (
        serde_json::from_str::<Value>(a),
        serde_json::from_str::<Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// In-memory record of exchanges with hit/miss accounting.
#[derive(Debug, Default)]
pub struct MemoryCache {
    exchanges: Mutex<Vec<Exchange>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from previously exported exchanges.
    pub fn with_exchanges(exchanges: Vec<Exchange>) -> Self {
        Self {
            exchanges: Mutex::new(exchanges),
            ..Self::default()
        }
    }

    /// Snapshot of all recorded exchanges, in recording order.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.exchanges.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.exchanges.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

impl RequestInterceptor for MemoryCache {
    fn try_read(&self, method: &str, url: &str, body: &str) -> Option<String> {
        let found = self
            .exchanges
            .lock()
            .iter()
            .find(|exchange| exchange.matches(method, url, body))
            .map(|exchange| exchange.response.clone());

        match found {
            Some(response) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("Cache hit for {} {}", method, url);
                Some(response)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::debug!("Cache miss for {} {}", method, url);
                None
            }
        }
    }

    fn write(&self, method: &str, url: &str, body: &str, response: &str) {
        let mut exchanges = self.exchanges.lock();
        let exchange = Exchange {
            method: method.to_string(),
            url: url.to_string(),
            body: body.to_string(),
            response: response.to_string(),
        };
        match exchanges.iter_mut().find(|e| e.matches(method, url, body)) {
            Some(existing) => *existing = exchange,
            None => exchanges.push(exchange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.notion.so/api/v3/getRecordValues";

    #[test]
    fn matches_json_equivalent_bodies() {
        let cache = MemoryCache::new();
        cache.write("POST", URL, r#"{"a":1,"b":[2,3]}"#, "response");

        assert_eq!(
            cache.try_read("POST", URL, r#"{ "b": [2, 3], "a": 1 }"#),
            Some("response".to_string())
        );
        assert_eq!(cache.try_read("POST", URL, r#"{"a":2,"b":[2,3]}"#), None);
        assert_eq!(cache.try_read("GET", URL, r#"{"a":1,"b":[2,3]}"#), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn rewriting_replaces_and_exports() {
        let cache = MemoryCache::new();
        cache.write("POST", URL, "{}", "old");
        cache.write("POST", URL, "{ }", "new");
        assert_eq!(cache.len(), 1);

        let exported = serde_json::to_string(&cache.exchanges()).unwrap();
        let restored = MemoryCache::with_exchanges(serde_json::from_str(&exported).unwrap());
        assert_eq!(restored.try_read("POST", URL, "{}"), Some("new".to_string()));
    }
}
