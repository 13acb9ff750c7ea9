//! Memo use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for memo callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::memo::{Memo, MemoId};
use crate::query::{Page, PageRequest, Sort, SortField};
use crate::repo::memo_repo::{MemoRepository, RepoResult};
use log::info;

/// Prefix used by [`MemoService::register_samples`].
pub const SAMPLE_TEXT_PREFIX: &str = "memo sample..";

/// Use-case service wrapper for memo operations.
pub struct MemoService<R: MemoRepository> {
    repo: R,
}

impl<R: MemoRepository> MemoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository for operations without a
    /// service-level wrapper.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn write(&self, memo_text: &str) -> RepoResult<Memo> {
        self.repo.insert(memo_text)
    }

    /// Inserts `count` memos with texts `memo sample..1` through
    /// `memo sample..{count}` and returns them in insertion order.
    pub fn register_samples(&self, count: u32) -> RepoResult<Vec<Memo>> {
        let memos = (1..=count)
            .map(|index| self.repo.insert(&format!("{SAMPLE_TEXT_PREFIX}{index}")))
            .collect::<RepoResult<Vec<_>>>()?;
        info!(
            "event=memo_samples module=service status=ok count={}",
            memos.len()
        );
        Ok(memos)
    }

    pub fn read(&self, mno: MemoId) -> RepoResult<Option<Memo>> {
        self.repo.find_by_id(mno)
    }

    /// Replaces memo text. Returns `false` when no memo has this id.
    pub fn rename(&self, mno: MemoId, memo_text: &str) -> RepoResult<bool> {
        Ok(self.repo.update_text(mno, memo_text)? == 1)
    }

    /// Removes one memo. Returns `false` when no memo has this id.
    pub fn remove(&self, mno: MemoId) -> RepoResult<bool> {
        Ok(self.repo.delete_by_id(mno)? == 1)
    }

    /// Deletes every memo below `threshold` and returns how many went away.
    pub fn purge_before(&self, threshold: MemoId) -> RepoResult<usize> {
        self.repo.delete_where_id_less_than(threshold)
    }

    /// Pages `from <= mno <= to`, newest id first.
    pub fn page_between(
        &self,
        from: MemoId,
        to: MemoId,
        page_index: u32,
        page_size: u32,
    ) -> RepoResult<Page<Memo>> {
        let page = PageRequest::of(page_index, page_size)?;
        self.repo
            .list_range(from, to, &Sort::desc(SortField::Mno), &page)
    }

    /// Pages the whole table in caller-defined order.
    pub fn page_all(&self, page: &PageRequest) -> RepoResult<Page<Memo>> {
        self.repo.find_all(page)
    }
}
