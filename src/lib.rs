//! Reconstructs complete Notion page graphs from the paginated,
//! partially-consistent private `api/v3` content API.
//!
//! ```no_run
//! use notion_pagegraph::{ClientConfig, DownloadOptions, NotionClient, NotionId, PageDownloader};
//!
//! # async fn run() -> notion_pagegraph::Result<()> {
//! let client = NotionClient::new(ClientConfig::default())?;
//! let downloader = PageDownloader::new(client, DownloadOptions::default());
//! let page = downloader
//!     .download_page(&NotionId::parse("ea07db1b9bff415ab180b0525f3898f6")?)
//!     .await?;
//! println!("{}", notion_pagegraph::analytics::outline(&page));
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod types;

pub use api::NotionClient;
pub use config::{ClientConfig, DownloadOptions, PipelineConfig};
pub use error::{AppError, Result};
pub use graph::{EntitySet, Page, PageKind, TableView};
pub use pipeline::{ContentSource, PageDownloader};
pub use types::NotionId;
