//! Client-side cache of the full user collection plus derived paging state.
//!
//! The collection is replaced wholesale on every fetch. Filtering by the
//! search term happens when a fetch result is applied; changing the term alone
//! does not re-filter. Paging recomputes the visible slice immediately from
//! the cached collection.

use crate::api::UserApi;
use crate::error::ApiError;
use crate::model::{User, UserId};
use crate::search::{filter_users, page_count, page_slice};

/// Page sizes offered by the list screen.
pub const PAGE_SIZES: [usize; 3] = [3, 6, 9];
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

#[derive(Clone, Debug)]
pub struct CollectionStore {
    all: Vec<User>,
    search_term: String,
    /// Term the cached `filtered_count`/`visible` were computed with.
    applied_term: String,
    page_index: usize,
    page_size: usize,
    filtered_count: usize,
    page_count: usize,
    visible: Vec<User>,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CollectionStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            search_term: String::new(),
            applied_term: String::new(),
            page_index: 1,
            page_size: page_size.max(1),
            filtered_count: 0,
            page_count: 0,
            visible: Vec::new(),
        }
    }

    pub fn all(&self) -> &[User] {
        &self.all
    }

    /// The page currently shown.
    pub fn visible(&self) -> &[User] {
        &self.visible
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    /// Store the term. Takes effect on the next `refresh`/`find`.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Jump to a 1-based page. Not clamped: a page past the end shows no rows.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
        self.recompute();
    }

    /// Change the page size and go back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 1;
        self.recompute();
    }

    /// Replace the cached collection with a fresh fetch and re-derive the page.
    pub fn apply_fetched(&mut self, users: Vec<User>) {
        self.all = users;
        self.applied_term = self.search_term.clone();
        self.recompute();
        tracing::debug!(
            total = self.all.len(),
            filtered = self.filtered_count,
            page = self.page_index,
            pages = self.page_count,
            "collection refreshed"
        );
    }

    fn recompute(&mut self) {
        let filtered = filter_users(&self.all, &self.applied_term);
        self.filtered_count = filtered.len();
        self.page_count = page_count(filtered.len(), self.page_size);
        self.visible = page_slice(&filtered, self.page_index, self.page_size)
            .iter()
            .map(|u| (*u).clone())
            .collect();
    }

    /// Id of the row at `index` in the visible page, as rendered.
    pub fn row_id(&self, index: usize) -> Option<UserId> {
        self.visible.get(index).and_then(|u| u.id.clone())
    }

    /// Resolve the row to open in the edit form. Does not mutate the store.
    pub fn open_record(&self, index: usize) -> Option<UserId> {
        self.row_id(index)
    }

    /// Drop a deleted record from the local page and collection ahead of the next fetch.
    pub fn remove_local(&mut self, id: &UserId) -> Option<User> {
        self.visible.retain(|u| u.id.as_ref() != Some(id));
        let pos = self.all.iter().position(|u| u.id.as_ref() == Some(id))?;
        Some(self.all.remove(pos))
    }

    /// Start a find: back to page 1. The refetch that follows applies the term.
    pub fn begin_find(&mut self) {
        self.page_index = 1;
        self.recompute();
    }

    /// Apply the outcome of a collection fetch. On failure the previous state stays visible.
    pub fn apply_fetch_result(&mut self, result: Result<Vec<User>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(users) => {
                self.apply_fetched(users);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch users; keeping previous page");
                Err(e)
            }
        }
    }

    /// Apply the outcome of a remote delete. On success the row is removed
    /// locally; on failure nothing changes.
    pub fn apply_delete_result(&mut self, id: &UserId, result: Result<(), ApiError>) -> Result<(), ApiError> {
        if let Err(e) = result {
            tracing::error!(%id, error = %e, "failed to delete user");
            return Err(e);
        }
        tracing::info!(%id, "user deleted");
        self.remove_local(id);
        Ok(())
    }

    /// Fetch the full collection.
    pub async fn refresh<A: UserApi>(&mut self, api: &A) -> Result<(), ApiError> {
        let result = api.fetch_all().await;
        self.apply_fetch_result(result)
    }

    /// Go back to page 1 and refetch.
    pub async fn find<A: UserApi>(&mut self, api: &A) -> Result<(), ApiError> {
        self.begin_find();
        self.refresh(api).await
    }

    /// Delete `id` remotely, then refetch the collection.
    pub async fn delete_record<A: UserApi>(&mut self, api: &A, id: &UserId) -> Result<(), ApiError> {
        let result = api.delete(id).await;
        self.apply_delete_result(id, result)?;
        // a failed refetch leaves the optimistic removal in place
        let _ = self.refresh(api).await;
        Ok(())
    }
}
