//! Access to the private `api/v3` content API.
//!
//! Layered bottom-up: `transport` moves bytes, `client` adds pacing, retry
//! and interception, `parser` types the records. The remaining modules are
//! the acquisition stages built on those.

pub mod chunk_loader;
pub mod client;
pub mod collection_query;
pub mod interceptor;
pub mod missing_refs;
pub mod parser;
pub mod responses;
pub mod throttle;
pub mod transport;

pub use chunk_loader::{load_chunks_into, load_document};
pub use client::NotionClient;
pub use collection_query::materialize_table_views;
pub use interceptor::{Exchange, MemoryCache, RequestInterceptor};
pub use missing_refs::{find_missing, resolve_missing, MissingReport};
pub use parser::{decode_record, decode_record_map, DecodedRecord};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport};
