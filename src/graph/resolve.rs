// src/graph/resolve.rs
//! Turns the flat entity set into a navigable graph.
//!
//! Two passes: link every block to its live children (deriving display
//! fields on the way), then attach parent back-references. Both store ids
//! only; the set keeps owning the blocks.

use super::entity_set::EntitySet;
use crate::error::{AppError, Result};
use crate::model::{Block, DisplayFields, ParentTable};
use crate::types::NotionId;

/// Resolves children and parents of every live block.
pub fn resolve(set: &mut EntitySet) -> Result<()> {
    let linked = link_children(set);
    attach_parents(set)?;
    log::info!(
        "Resolved {} block(s), {} id(s) skipped",
        linked,
        set.skipped_count()
    );
    Ok(())
}

/// Links each live block to the live blocks of its content list.
///
/// Content ids that aren't live are dropped. Every block is resolved at
/// most once, so reference cycles terminate. Returns how many blocks this
/// call resolved.
pub fn link_children(set: &mut EntitySet) -> usize {
    let mut resolved = 0;

    for start in set.block_ids_sorted() {
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let Some(block) = set.block(&id) else {
                continue;
            };
            if block.resolved {
                continue;
            }

            let children: Vec<NotionId> = block
                .content
                .iter()
                .filter(|child| set.contains_block(child))
                .cloned()
                .collect();
            let dropped = block.content.len() - children.len();
            if dropped > 0 {
                log::debug!("Block {} has {} unavailable child(ren)", id, dropped);
            }

            if let Some(block) = set.block_mut(&id) {
                block.resolved = true;
                block.display = DisplayFields::derive(&block.block_type, block.properties.as_ref());
                block.children = children.clone();
                resolved += 1;
            }

            stack.extend(children.into_iter().rev());
        }
    }

    resolved
}

/// Sets `parent` on every block whose parent belongs to this download.
///
/// Pages that are the root, or that appear here only as a link or mention,
/// have their parent elsewhere and get none. Any other block parented by a
/// block must find that parent live.
pub fn attach_parents(set: &mut EntitySet) -> Result<()> {
    let mut assignments = Vec::new();

    for id in set.block_ids_sorted() {
        let Some(block) = set.block(&id) else {
            continue;
        };

        let parent = match &block.parent_table {
            ParentTable::Space | ParentTable::Collection => None,
            ParentTable::Block => {
                if block.is_page() && (set.root() == Some(&id) || !is_sub_page(set, block)) {
                    None
                } else {
                    match &block.parent_id {
                        Some(parent_id) if set.contains_block(parent_id) => Some(parent_id.clone()),
                        other => {
                            return Err(AppError::MissingParent {
                                block_id: id.clone(),
                                parent_id: other.as_ref().map(NotionId::to_string).unwrap_or_default(),
                            })
                        }
                    }
                }
            }
            ParentTable::Other(table) => {
                log::debug!("Unsupported parent table '{}' of block {}", table, id);
                None
            }
        };

        assignments.push((id, parent));
    }

    for (id, parent) in assignments {
        if let Some(block) = set.block_mut(&id) {
            block.parent = parent;
        }
    }

    Ok(())
}

/// A page is a sub-page when its parent is live and lists it as content.
fn is_sub_page(set: &EntitySet, block: &Block) -> bool {
    block
        .parent_id
        .as_ref()
        .and_then(|parent_id| set.block(parent_id))
        .is_some_and(|parent| parent.content.contains(&block.id))
}
