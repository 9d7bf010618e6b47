// src/graph/entity_set.rs
//! Per-download store of every record seen, partitioned by kind.
//!
//! The set owns the blocks; the graph built on top of it refers to blocks
//! by id only. Ids that are known to be unavailable (deleted, restricted,
//! or out of scope) live in the skip set, which never overlaps the live
//! block partition.

use crate::api::parser::DecodedRecord;
use crate::model::{
    Activity, Block, Collection, CollectionView, Comment, Discussion, Entity, Space, User,
};
use crate::types::NotionId;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Outcome of offering a block to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Inserted,
    Replaced,
    /// The set already holds a newer version.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct EntitySet {
    root: Option<NotionId>,
    blocks: IndexMap<NotionId, Block>,
    collections: IndexMap<NotionId, Collection>,
    collection_views: IndexMap<NotionId, CollectionView>,
    comments: IndexMap<NotionId, Comment>,
    discussions: IndexMap<NotionId, Discussion>,
    spaces: IndexMap<NotionId, Space>,
    users: IndexMap<NotionId, User>,
    activities: IndexMap<NotionId, Activity>,
    skipped: BTreeSet<NotionId>,
}

impl EntitySet {
    /// An empty set with no designated root (used for query results).
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set for the download of `root`.
    pub fn for_root(root: NotionId) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    pub fn root(&self) -> Option<&NotionId> {
        self.root.as_ref()
    }

    // --- Blocks ---

    /// Adds a live block, keeping whichever version is newer.
    ///
    /// Admitting a block takes its id out of the skip set.
    pub fn admit_block(&mut self, block: Block) -> Admission {
        let id = block.id.clone();
        let admission = match self.blocks.get(&id) {
            Some(existing) if existing.version > block.version => return Admission::Stale,
            Some(_) => Admission::Replaced,
            None => Admission::Inserted,
        };
        self.skipped.remove(&id);
        self.blocks.insert(id, block);
        admission
    }

    /// Records a dead block. A live copy survives only if it is newer.
    pub fn retire_block(&mut self, block: &Block) {
        if let Some(existing) = self.blocks.get(&block.id) {
            if existing.version > block.version {
                return;
            }
            self.blocks.shift_remove(&block.id);
        }
        self.skipped.insert(block.id.clone());
    }

    /// Marks an id as unavailable unless it is already live.
    pub fn skip(&mut self, id: NotionId) -> bool {
        if self.blocks.contains_key(&id) {
            return false;
        }
        self.skipped.insert(id)
    }

    pub fn block(&self, id: &NotionId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub(crate) fn block_mut(&mut self, id: &NotionId) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    pub fn contains_block(&self, id: &NotionId) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn is_skipped(&self, id: &NotionId) -> bool {
        self.skipped.contains(id)
    }

    /// Live or skipped: nothing more to fetch for this id.
    pub fn is_known(&self, id: &NotionId) -> bool {
        self.contains_block(id) || self.is_skipped(id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Live block ids in sorted order, for deterministic passes.
    pub fn block_ids_sorted(&self) -> Vec<NotionId> {
        let mut ids: Vec<NotionId> = self.blocks.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn skipped(&self) -> impl Iterator<Item = &NotionId> {
        self.skipped.iter()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    // --- Everything else ---

    /// Stores any decoded entity. Blocks go through the liveness and
    /// version rules of [`admit_block`](Self::admit_block).
    pub fn insert(&mut self, entity: Entity) {
        match entity {
            Entity::Block(block) => {
                if block.alive {
                    self.admit_block(*block);
                } else {
                    self.retire_block(&block);
                }
            }
            Entity::Collection(c) => keep_newer(&mut self.collections, *c, |c| (&c.id, c.version)),
            Entity::CollectionView(v) => {
                keep_newer(&mut self.collection_views, *v, |v| (&v.id, v.version))
            }
            Entity::Comment(c) => keep_newer(&mut self.comments, *c, |c| (&c.id, c.version)),
            Entity::Discussion(d) => keep_newer(&mut self.discussions, *d, |d| (&d.id, d.version)),
            Entity::Space(s) => keep_newer(&mut self.spaces, *s, |s| (&s.id, s.version)),
            Entity::User(u) => {
                self.users.insert(u.id.clone(), *u);
            }
            Entity::Activity(a) => {
                self.activities.insert(a.id.clone(), *a);
            }
        }
    }

    /// Merges a decoded record map. A block key without a value is skipped.
    pub fn absorb(&mut self, records: Vec<(NotionId, DecodedRecord)>) {
        for (key, record) in records {
            match record.entity {
                Some(entity) => self.insert(entity),
                None if record.table == crate::model::Table::Block => {
                    self.skip(key);
                }
                None => {}
            }
        }
    }

    pub fn collection(&self, id: &NotionId) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn collection_view(&self, id: &NotionId) -> Option<&CollectionView> {
        self.collection_views.get(id)
    }

    pub fn collection_views(&self) -> impl Iterator<Item = &CollectionView> {
        self.collection_views.values()
    }

    pub fn comment(&self, id: &NotionId) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    pub fn discussion(&self, id: &NotionId) -> Option<&Discussion> {
        self.discussions.get(id)
    }

    pub fn discussions(&self) -> impl Iterator<Item = &Discussion> {
        self.discussions.values()
    }

    pub fn space(&self, id: &NotionId) -> Option<&Space> {
        self.spaces.get(id)
    }

    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.spaces.values()
    }

    pub fn user(&self, id: &NotionId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn activity(&self, id: &NotionId) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }
}

fn keep_newer<T>(map: &mut IndexMap<NotionId, T>, item: T, key: impl Fn(&T) -> (&NotionId, i64)) {
    let (id, version) = key(&item);
    if let Some(existing) = map.get(id) {
        if key(existing).1 > version {
            return;
        }
    }
    let id = id.clone();
    map.insert(id, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(id: &str, version: i64, alive: bool) -> Block {
        serde_json::from_value(json!({
            "id": id,
            "type": "text",
            "version": version,
            "alive": alive
        }))
        .unwrap()
    }

    const A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn newer_versions_win() {
        let mut set = EntitySet::new();
        assert_eq!(set.admit_block(block(A, 5, true)), Admission::Inserted);
        assert_eq!(set.admit_block(block(A, 3, true)), Admission::Stale);
        assert_eq!(set.block(&NotionId::parse(A).unwrap()).unwrap().version, 5);
        assert_eq!(set.admit_block(block(A, 7, true)), Admission::Replaced);
        assert_eq!(set.block(&NotionId::parse(A).unwrap()).unwrap().version, 7);
    }

    #[test]
    fn live_and_skipped_stay_disjoint() {
        let id = NotionId::parse(A).unwrap();
        let mut set = EntitySet::new();

        assert!(set.skip(id.clone()));
        assert!(set.is_skipped(&id));

        set.admit_block(block(A, 1, true));
        assert!(set.contains_block(&id));
        assert!(!set.is_skipped(&id));

        assert!(!set.skip(id.clone()));
        assert!(!set.is_skipped(&id));

        set.insert(Entity::Block(Box::new(block(A, 2, false))));
        assert!(!set.contains_block(&id));
        assert!(set.is_skipped(&id));
    }

    #[test]
    fn stale_dead_copy_does_not_retire_live_block() {
        let id = NotionId::parse(A).unwrap();
        let mut set = EntitySet::new();
        set.admit_block(block(A, 4, true));
        set.retire_block(&block(A, 2, false));
        assert!(set.contains_block(&id));
        assert!(!set.is_skipped(&id));
    }
}
