// src/analytics/mod.rs
//! Content measurement and structure dumps for downloaded pages.

use crate::graph::Page;
use crate::model::Block;
use indexmap::IndexMap;
use std::fmt::Write;

/// Statistics of a downloaded page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStats {
    /// Live blocks in the download, reachable or not.
    pub live_blocks: usize,
    /// Blocks reachable from the root.
    pub reachable_blocks: usize,
    pub skipped_ids: usize,
    /// Reachable blocks per type, in order of first appearance.
    pub blocks_by_type: IndexMap<String, usize>,
    pub sub_pages: usize,
    pub deepest_nesting: usize,
    pub collections: usize,
    pub table_views: usize,
    pub table_rows: usize,
    pub users: usize,
}

/// Measures a page by walking it from the root.
pub fn measure_page(page: &Page) -> PageStats {
    let entities = page.entities();
    let mut stats = PageStats {
        live_blocks: entities.block_count(),
        skipped_ids: entities.skipped_count(),
        sub_pages: page.sub_pages().len(),
        collections: entities.collections().count(),
        table_views: page.table_views().len(),
        table_rows: page.table_views().iter().map(|view| view.rows.len()).sum(),
        users: entities.users().count(),
        ..PageStats::default()
    };

    page.for_each_block(|block, depth| {
        stats.reachable_blocks += 1;
        stats.deepest_nesting = stats.deepest_nesting.max(depth);
        *stats
            .blocks_by_type
            .entry(block.block_type.to_string())
            .or_insert(0) += 1;
    });

    stats
}

/// Indented `type: title` listing of the reachable tree, with the rows of
/// each table view listed under its block.
pub fn outline(page: &Page) -> String {
    let mut out = String::new();

    page.for_each_block(|block, depth| {
        let indent = "  ".repeat(depth);
        let _ = writeln!(out, "{}{}", indent, describe(block));

        for view in page.table_views_for(&block.id) {
            let _ = writeln!(
                out,
                "{}  [{}: {}] {} of {} row(s)",
                indent,
                view.collection_name,
                view.view_name,
                view.rows.len(),
                view.total
            );
            for row in &view.rows {
                let _ = writeln!(out, "{}    - {}", indent, row.block.title());
            }
        }
    });

    out
}

fn describe(block: &Block) -> String {
    let title = block.title();
    if title.is_empty() {
        format!("{} {}", block.block_type, block.id)
    } else {
        format!("{}: {}", block.block_type, title)
    }
}

impl std::fmt::Display for PageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Blocks: {} reachable of {} live, {} skipped id(s)",
            self.reachable_blocks, self.live_blocks, self.skipped_ids
        )?;
        writeln!(f, "Deepest nesting: {}", self.deepest_nesting)?;
        writeln!(f, "Sub-pages: {}", self.sub_pages)?;
        writeln!(
            f,
            "Collections: {}, table views: {}, rows: {}",
            self.collections, self.table_views, self.table_rows
        )?;
        if self.users > 0 {
            writeln!(f, "Users: {}", self.users)?;
        }
        for (block_type, count) in &self.blocks_by_type {
            writeln!(f, "  {:<22} {}", block_type, count)?;
        }
        Ok(())
    }
}
