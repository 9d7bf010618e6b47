// src/pipeline.rs
//! The download pipeline: root fetch, chunks, missing references, graph,
//! collection views, users.
//!
//! Every stage awaits its requests one after another; nothing overlaps.

use crate::api::parser::decode_record;
use crate::api::{load_chunks_into, materialize_table_views, resolve_missing, NotionClient};
use crate::config::DownloadOptions;
use crate::error::{AppError, Result};
use crate::graph::{resolve, EntitySet, Page};
use crate::model::{Entity, Table};
use crate::types::NotionId;
use std::collections::BTreeSet;

/// Retrieves a fully resolved page by id.
#[async_trait::async_trait]
pub trait ContentSource {
    async fn download(&self, root_id: &NotionId) -> Result<Page>;
}

/// Downloads pages through one `NotionClient`.
pub struct PageDownloader {
    client: NotionClient,
    options: DownloadOptions,
}

impl PageDownloader {
    pub fn new(client: NotionClient, options: DownloadOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &NotionClient {
        &self.client
    }

    /// Runs every stage for `root_id`. Any failure aborts the download;
    /// no partial page is returned.
    pub async fn download_page(&self, root_id: &NotionId) -> Result<Page> {
        log::info!("Downloading page {}", root_id);
        let mut set = EntitySet::for_root(root_id.clone());

        self.fetch_root(root_id, &mut set).await?;
        load_chunks_into(&self.client, root_id, &mut set).await?;
        resolve_missing(&self.client, &mut set, self.options.effective_batch_size()).await?;
        resolve(&mut set)?;
        let table_views = materialize_table_views(&self.client, &set).await?;

        if self.options.fetch_users {
            self.fetch_users(&mut set).await?;
        }

        Ok(Page::new(root_id.clone(), set, table_views))
    }

    /// Fetches the root block on its own first; a root without a value is
    /// usually a page the session cannot see.
    async fn fetch_root(&self, root_id: &NotionId, set: &mut EntitySet) -> Result<()> {
        let response = self
            .client
            .get_record_values(Table::Block, std::slice::from_ref(root_id))
            .await?;

        let root = match response.results.first() {
            Some(result) => decode_record(Table::Block, result)?.entity,
            None => None,
        };

        match root {
            Some(Entity::Block(block)) if block.alive && block.id == *root_id => {
                set.admit_block(*block);
                Ok(())
            }
            _ => Err(AppError::PageNotFound(root_id.clone())),
        }
    }

    /// Adds the creators and last editors of live blocks to the user partition.
    async fn fetch_users(&self, set: &mut EntitySet) -> Result<()> {
        let wanted: BTreeSet<NotionId> = set
            .blocks()
            .flat_map(|block| [block.creator_id(), block.last_editor_id()])
            .flatten()
            .filter_map(|id| NotionId::parse(id).ok())
            .filter(|id| set.user(id).is_none())
            .collect();
        let wanted: Vec<NotionId> = wanted.into_iter().collect();

        for batch in wanted.chunks(self.options.effective_batch_size()) {
            let response = self.client.get_record_values(Table::NotionUser, batch).await?;
            for result in &response.results {
                if let Some(entity) = decode_record(Table::NotionUser, result)?.entity {
                    set.insert(entity);
                }
            }
        }

        log::info!("Fetched {} of {} user(s)", set.users().count(), wanted.len());
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentSource for PageDownloader {
    async fn download(&self, root_id: &NotionId) -> Result<Page> {
        self.download_page(root_id).await
    }
}
