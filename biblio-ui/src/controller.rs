//! List controller for the article table
//!
//! Owns the table's query state (per-column filters, sort, page) and
//! the last applied listing page. Every state change re-fetches through
//! the client, mirroring a reactive table component where the fetch
//! depends on filter, sort, and page inputs.
//!
//! Responses are applied through a sequence-number guard: each fetch is
//! stamped when it starts and a response is only applied if no newer
//! response has been applied already. Overlapping fetches therefore
//! cannot overwrite fresh data with a stale result, no matter the
//! completion order.

use biblio_common::api::{Article, ArticleDraft, ArticlePage, SortOrder};

use crate::client::{ArticleClient, ClientError};

/// Page length used when none is chosen, matching the table's fixed
/// two-row pages.
pub const DEFAULT_PAGE_SIZE: i64 = 2;

/// Sortable columns of the article table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    ArticleTitle,
    ArticleAbstract,
    ArticleDate,
}

impl SortColumn {
    /// Query-string value for `sortField`.
    pub fn wire_name(self) -> &'static str {
        match self {
            SortColumn::ArticleTitle => "articleTitle",
            SortColumn::ArticleAbstract => "articleAbstract",
            SortColumn::ArticleDate => "articleDate",
        }
    }
}

/// Stamp for one in-flight fetch.
///
/// Issued by [`ListController::begin_fetch`] and consumed by
/// [`ListController::apply_page`]. Not clonable, so a ticket can be
/// redeemed at most once.
#[derive(Debug)]
pub struct FetchTicket {
    seq: u64,
}

/// Query state and last applied listing for the article table.
pub struct ListController {
    client: ArticleClient,
    title_filter: String,
    abstract_filter: String,
    sort_field: Option<SortColumn>,
    sort_order: SortOrder,
    page: i64,
    page_size: i64,
    records: Vec<Article>,
    count: i64,
    fetch_seq: u64,
    applied_seq: u64,
}

impl ListController {
    pub fn new(client: ArticleClient) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(client: ArticleClient, page_size: i64) -> Self {
        Self {
            client,
            title_filter: String::new(),
            abstract_filter: String::new(),
            sort_field: None,
            sort_order: SortOrder::Ascending,
            page: 0,
            page_size: page_size.max(1),
            records: Vec::new(),
            count: 0,
            fetch_seq: 0,
            applied_seq: 0,
        }
    }

    // ========================================
    // Current state
    // ========================================

    /// Rows of the last applied page.
    pub fn records(&self) -> &[Article] {
        &self.records
    }

    /// Total number of articles matching the active filters.
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Number of pages the current count spans.
    pub fn page_count(&self) -> i64 {
        (self.count + self.page_size - 1) / self.page_size
    }

    pub fn title_filter(&self) -> &str {
        &self.title_filter
    }

    pub fn abstract_filter(&self) -> &str {
        &self.abstract_filter
    }

    /// Active sort, if any.
    pub fn sort(&self) -> Option<(SortColumn, SortOrder)> {
        self.sort_field.map(|field| (field, self.sort_order))
    }

    /// Derive the listing query parameters from the current state.
    ///
    /// Only non-empty filters are emitted; `sortField`/`sortOrder` only
    /// when a sort is active; `page` and `pageSize` always.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.title_filter.is_empty() {
            params.push(("articleTitle".to_string(), self.title_filter.clone()));
        }
        if !self.abstract_filter.is_empty() {
            params.push(("articleAbstract".to_string(), self.abstract_filter.clone()));
        }
        if let Some(field) = self.sort_field {
            params.push(("sortField".to_string(), field.wire_name().to_string()));
            params.push(("sortOrder".to_string(), self.sort_order.wire_value().to_string()));
        }
        params.push(("page".to_string(), self.page.to_string()));
        params.push(("pageSize".to_string(), self.page_size.to_string()));

        params
    }

    // ========================================
    // State changes (each one re-fetches)
    // ========================================

    /// Set the title filter and re-fetch. The page index is kept as-is.
    pub async fn set_title_filter(
        &mut self,
        value: impl Into<String>,
    ) -> Result<bool, ClientError> {
        self.title_filter = value.into();
        self.refresh().await
    }

    /// Set the abstract filter and re-fetch.
    pub async fn set_abstract_filter(
        &mut self,
        value: impl Into<String>,
    ) -> Result<bool, ClientError> {
        self.abstract_filter = value.into();
        self.refresh().await
    }

    /// Move to a zero-based page index and re-fetch.
    pub async fn set_page(&mut self, page: i64) -> Result<bool, ClientError> {
        self.page = page.max(0);
        self.refresh().await
    }

    /// Sort by a column and re-fetch. Selecting a new column sorts
    /// ascending; selecting the active column again flips the order.
    pub async fn toggle_sort(&mut self, column: SortColumn) -> Result<bool, ClientError> {
        if self.sort_field == Some(column) {
            self.sort_order = match self.sort_order {
                SortOrder::Ascending => SortOrder::Descending,
                SortOrder::Descending => SortOrder::Ascending,
            };
        } else {
            self.sort_field = Some(column);
            self.sort_order = SortOrder::Ascending;
        }
        self.refresh().await
    }

    /// Drop any active sort and re-fetch.
    pub async fn clear_sort(&mut self) -> Result<bool, ClientError> {
        self.sort_field = None;
        self.sort_order = SortOrder::Ascending;
        self.refresh().await
    }

    // ========================================
    // Fetching
    // ========================================

    /// Stamp a new fetch. The matching response must be handed to
    /// [`apply_page`](Self::apply_page) together with this ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_seq += 1;
        FetchTicket {
            seq: self.fetch_seq,
        }
    }

    /// Apply a fetched page unless a newer one has been applied since
    /// the ticket was issued. Returns whether the page was applied.
    pub fn apply_page(&mut self, ticket: FetchTicket, page: ArticlePage) -> bool {
        if ticket.seq <= self.applied_seq {
            tracing::debug!(seq = ticket.seq, applied = self.applied_seq, "Dropping stale page");
            return false;
        }
        self.applied_seq = ticket.seq;
        self.records = page.records;
        self.count = page.count;
        true
    }

    /// Fetch the page for the current query state and apply it.
    ///
    /// Returns whether the response was applied (it is only dropped if
    /// a newer fetch completed in between through the ticket API).
    pub async fn refresh(&mut self) -> Result<bool, ClientError> {
        let ticket = self.begin_fetch();
        let params = self.query_params();
        let page = self.client.list_articles(&params).await?;
        Ok(self.apply_page(ticket, page))
    }

    // ========================================
    // Record operations (each one re-fetches)
    // ========================================

    /// Create an article, then re-fetch the current page.
    pub async fn create_article(&mut self, draft: &ArticleDraft) -> Result<Article, ClientError> {
        let created = self.client.create_article(draft).await?;
        self.refresh().await?;
        Ok(created)
    }

    /// Update an article, then re-fetch the current page.
    pub async fn save_article(
        &mut self,
        article_id: i64,
        draft: &ArticleDraft,
    ) -> Result<Article, ClientError> {
        let updated = self.client.update_article(article_id, draft).await?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete an article immediately, then re-fetch the current page.
    pub async fn delete_article(&mut self, article_id: i64) -> Result<Article, ClientError> {
        let deleted = self.client.delete_article(article_id).await?;
        self.refresh().await?;
        Ok(deleted)
    }

    /// The underlying client, for calls outside the listing flow.
    pub fn client(&self) -> &ArticleClient {
        &self.client
    }
}
