// src/graph/page.rs
//! The finished download handed to presentation code.

use super::entity_set::EntitySet;
use super::table_view::TableView;
use crate::constants::NOTION_HOST;
use crate::model::Block;
use crate::types::NotionId;
use std::collections::HashSet;

/// How a page block relates to the download it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The page that was downloaded.
    TopLevel,
    /// A page nested inside the downloaded tree.
    SubPage,
    /// A page that only appears as a link or mention.
    Link,
}

/// A resolved page graph.
#[derive(Debug, Clone)]
pub struct Page {
    id: NotionId,
    entities: EntitySet,
    table_views: Vec<TableView>,
}

impl Page {
    pub fn new(id: NotionId, entities: EntitySet, table_views: Vec<TableView>) -> Self {
        Self {
            id,
            entities,
            table_views,
        }
    }

    pub fn id(&self) -> &NotionId {
        &self.id
    }

    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    pub fn root(&self) -> Option<&Block> {
        self.entities.block(&self.id)
    }

    pub fn block(&self, id: &NotionId) -> Option<&Block> {
        self.entities.block(id)
    }

    /// Resolved children of `id`, in content order.
    pub fn children_of(&self, id: &NotionId) -> Vec<&Block> {
        self.block(id)
            .map(|block| {
                block
                    .children
                    .iter()
                    .filter_map(|child| self.entities.block(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parent_of(&self, id: &NotionId) -> Option<&Block> {
        self.block(id)
            .and_then(|block| block.parent.as_ref())
            .and_then(|parent| self.entities.block(parent))
    }

    pub fn page_kind(&self, id: &NotionId) -> Option<PageKind> {
        let block = self.block(id)?;
        if !block.is_page() {
            return None;
        }
        Some(if *id == self.id {
            PageKind::TopLevel
        } else if block.parent.is_some() {
            PageKind::SubPage
        } else {
            PageKind::Link
        })
    }

    /// Depth-first walk from the root, calling `visit(block, depth)`.
    /// Each block is visited at most once.
    pub fn for_each_block<F>(&self, mut visit: F)
    where
        F: FnMut(&Block, usize),
    {
        let mut visited = HashSet::new();
        let mut stack = vec![(self.id.clone(), 0usize)];

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(block) = self.entities.block(&id) else {
                continue;
            };
            visit(block, depth);
            for child in block.children.iter().rev() {
                stack.push((child.clone(), depth + 1));
            }
        }
    }

    /// Page blocks reachable from the root, excluding the root itself.
    pub fn sub_pages(&self) -> Vec<NotionId> {
        let mut pages = Vec::new();
        self.for_each_block(|block, _| {
            if block.is_page() && block.id != self.id {
                pages.push(block.id.clone());
            }
        });
        pages
    }

    pub fn notion_url(&self) -> String {
        format!("{}/{}", NOTION_HOST, self.id)
    }

    pub fn table_views(&self) -> &[TableView] {
        &self.table_views
    }

    /// Table views hosted by the `collection_view` block `block_id`.
    pub fn table_views_for(&self, block_id: &NotionId) -> Vec<&TableView> {
        self.table_views
            .iter()
            .filter(|view| &view.block_id == block_id)
            .collect()
    }

    /// Display name of a user, or the raw id when the user wasn't fetched.
    pub fn user_name(&self, user_id: &str) -> String {
        NotionId::parse(user_id)
            .ok()
            .and_then(|id| self.entities.user(&id))
            .map(|user| user.display_name())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user_id.to_string())
    }
}
