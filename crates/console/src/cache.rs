//! Member-list cache
//!
//! Holds paged member lists keyed by page size and search term, plus the set
//! of dependent views that must be refetched. Lists can be snapshotted before
//! an optimistic edit and restored verbatim if the edit is rejected.

use std::collections::{BTreeSet, HashMap};

use slotline_teams::MemberPage;

/// Cache key of one member listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberListKey {
    pub limit: i64,
    pub search_term: String,
}

impl MemberListKey {
    pub fn new(limit: i64, search_term: impl Into<String>) -> Self {
        Self {
            limit,
            search_term: search_term.into(),
        }
    }
}

/// Pages fetched so far for one listing, in fetch order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfiniteData {
    pub pages: Vec<MemberPage>,
    /// Offset each page was requested with
    pub page_params: Vec<i64>,
}

impl InfiniteData {
    /// Copy with `member_id` dropped from every page
    pub fn without_member(&self, member_id: i64) -> InfiniteData {
        InfiniteData {
            pages: self
                .pages
                .iter()
                .map(|page| MemberPage {
                    rows: page
                        .rows
                        .iter()
                        .filter(|row| row.id != member_id)
                        .cloned()
                        .collect(),
                    ..page.clone()
                })
                .collect(),
            page_params: self.page_params.clone(),
        }
    }

    pub fn contains_member(&self, member_id: i64) -> bool {
        self.pages
            .iter()
            .any(|page| page.rows.iter().any(|row| row.id == member_id))
    }
}

/// Views that depend on team membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CachedView {
    TeamsGet,
    EventTypes,
}

#[derive(Debug, Default)]
pub struct MemberListCache {
    lists: HashMap<MemberListKey, InfiniteData>,
    stale: BTreeSet<CachedView>,
}

impl MemberListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_infinite_data(&self, key: &MemberListKey) -> Option<&InfiniteData> {
        self.lists.get(key)
    }

    /// Copy of the listing for a later `restore`
    pub fn snapshot(&self, key: &MemberListKey) -> Option<InfiniteData> {
        self.lists.get(key).cloned()
    }

    /// Replace the listing with whatever `updater` returns; `None` removes it
    pub fn set_infinite_data<F>(&mut self, key: &MemberListKey, updater: F)
    where
        F: FnOnce(Option<&InfiniteData>) -> Option<InfiniteData>,
    {
        match updater(self.lists.get(key)) {
            Some(data) => {
                self.lists.insert(key.clone(), data);
            }
            None => {
                self.lists.remove(key);
            }
        }
    }

    /// Put back a snapshot exactly, including its absence
    pub fn restore(&mut self, key: &MemberListKey, snapshot: Option<InfiniteData>) {
        self.set_infinite_data(key, |_| snapshot);
    }

    pub fn invalidate(&mut self, view: CachedView) {
        tracing::debug!(?view, "Invalidating cached view");
        self.stale.insert(view);
    }

    pub fn is_invalidated(&self, view: CachedView) -> bool {
        self.stale.contains(&view)
    }

    /// Views waiting for a refetch, clearing the set
    pub fn take_invalidated(&mut self) -> Vec<CachedView> {
        std::mem::take(&mut self.stale).into_iter().collect()
    }
}
