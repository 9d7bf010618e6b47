// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how the engine
//! talks to the server: how much it asks for, how often, and how patiently.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Endpoint and request identity
// ---------------------------------------------------------------------------

/// Host serving the private content API.
pub const NOTION_HOST: &str = "https://www.notion.so";

/// Endpoint paths, relative to the base URL so a path prefix survives.
pub const LOAD_PAGE_CHUNK_PATH: &str = "api/v3/loadCachedPageChunk";
pub const GET_RECORD_VALUES_PATH: &str = "api/v3/getRecordValues";
pub const QUERY_COLLECTION_PATH: &str = "api/v3/queryCollection";

/// Browser user agent; the API treats unknown agents less kindly.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/69.0.3483.0 Safari/537.36";

pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Environment variable holding the optional `token_v2` session cookie.
pub const TOKEN_ENV_VAR: &str = "NOTION_TOKEN";

// ---------------------------------------------------------------------------
// Pagination and batching
// ---------------------------------------------------------------------------

/// Block limit of the first `loadCachedPageChunk` request.
pub const FIRST_CHUNK_LIMIT: u32 = 50;

/// Block limit of every follow-up `loadCachedPageChunk` request.
pub const NEXT_CHUNK_LIMIT: u32 = 30;

/// Largest id batch sent to `getRecordValues`.
///
/// The server has accepted batches of several thousand ids, but smaller
/// requests fail less often under load.
pub const MAX_RECORDS_PER_REQUEST: usize = 128 * 10;

/// Row limit of the `collection_group_results` reducer in `queryCollection`.
pub const QUERY_RESULTS_LIMIT: u32 = 50;

/// Time zone sent with collection queries when no user preference is known.
pub const DEFAULT_USER_TIME_ZONE: &str = "America/Los_Angeles";

// ---------------------------------------------------------------------------
// Pacing and resilience
// ---------------------------------------------------------------------------

/// Default minimum gap between the starts of two consecutive requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(300);

/// Waits applied before each retry of a rate-limited (429) request.
///
/// The schedule length is the retry budget: once exhausted the request fails.
pub const RATE_LIMIT_BACKOFF: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Per-request timeout applied by the HTTP transport.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
