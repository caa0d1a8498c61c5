//! Cursor-based pagination.
//!
//! [`Paginator`] follows continuation cursors strictly in order: every call
//! uses the cursor returned by the previous one. Each page fetch goes through
//! [`with_retry`], consecutive pages are spaced by the configured call delay,
//! and a hard page ceiling stops misbehaving remotes that never stop handing
//! out cursors.
//!
//! ```ignore
//! let paginator = Paginator::new(retry);
//! let fields = paginator
//!     .collect_all("dynamic_fields", |cursor| {
//!         client.get_dynamic_fields(&kiosk_id, cursor, 50)
//!     })
//!     .await?;
//! ```

use std::future::Future;

use anyhow::Result;
use sui_kiosk_types::RetryConfig;
use tracing::{debug, warn};

use crate::client::Page;
use crate::retry::{with_retry, Pacer};

/// Default page ceiling.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Drives a paginated remote operation to completion.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    retry: RetryConfig,
    max_pages: usize,
}

impl Paginator {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            retry,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Override the page ceiling (minimum 1).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetch every page and concatenate the results.
    ///
    /// If a page still fails after its retries, the whole accumulation is
    /// abandoned and that page's error is returned.
    pub async fn collect_all<T, F, Fut>(&self, label: &str, fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let mut all = Vec::new();
        self.for_each_page(label, fetch, |page| all.extend(page))
            .await?;
        Ok(all)
    }

    /// Fetch every page, handing each page's data to `sink` as soon as it
    /// arrives. Returns the number of pages fetched.
    pub async fn for_each_page<T, F, Fut, S>(
        &self,
        label: &str,
        mut fetch: F,
        mut sink: S,
    ) -> Result<usize>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
        S: FnMut(Vec<T>),
    {
        let mut pacer = Pacer::new(self.retry.call_delay);
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            pacer.tick().await;
            let page = with_retry(&self.retry, label, || fetch(cursor.clone())).await?;
            pages += 1;
            sink(page.data);

            match page.next_cursor {
                None => break,
                Some(next) if pages >= self.max_pages => {
                    warn!(
                        op = label,
                        pages,
                        next_cursor = %next,
                        "page ceiling reached, returning partial results"
                    );
                    break;
                }
                Some(next) => cursor = Some(next),
            }
        }

        debug!(op = label, pages, "pagination complete");
        Ok(pages)
    }
}
