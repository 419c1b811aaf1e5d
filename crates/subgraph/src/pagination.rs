// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use async_trait::async_trait;
use curate_config::PaginationConfig;
use curate_query::{litems_query::LitemsQuery, PageRequest, RawRecord};

use crate::client::{SubgraphClient, SubgraphError};

/// Anything able to serve one page of `litems`.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawRecord>, SubgraphError>;
}

#[async_trait]
impl PageSource for SubgraphClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawRecord>, SubgraphError> {
        let data = self.query::<LitemsQuery>(request.into()).await?;
        Ok(data.into_records())
    }
}

/// How a fetch ended.
#[derive(Debug)]
pub enum FetchStatus {
    /// A page shorter than the page size was received
    Complete,
    /// The page at `offset` failed, later pages were never requested
    Interrupted { offset: u64, error: SubgraphError },
    /// `max_pages` full pages were received without reaching a short one
    Truncated { max_pages: u32 },
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Interrupted { offset, error } => {
                write!(f, "interrupted at offset {offset}: {error}")
            }
            Self::Truncated { max_pages } => write!(f, "truncated after {max_pages} pages"),
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    /// Every record received, in page order
    pub records: Vec<RawRecord>,
    /// Number of page requests issued, including a failed one
    pub pages: u32,
    pub status: FetchStatus,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }
}

/// Offset pagination over `litems` for one registry at a time.
///
/// Pages are requested one after the other at offsets `0, page_size,
/// 2 * page_size, ...` until a page comes back with fewer than `page_size`
/// records. The endpoint reports no total count, so that short page is the
/// only end-of-list signal.
pub struct Paginator<'a, S> {
    source: &'a S,
    statuses: Vec<String>,
    page_size: u32,
    max_pages: Option<u32>,
}

impl<'a, S: PageSource> Paginator<'a, S> {
    pub fn new(source: &'a S, pagination: &PaginationConfig, statuses: Vec<String>) -> Self {
        Self {
            source,
            statuses,
            page_size: pagination.page_size,
            max_pages: pagination.max_pages,
        }
    }

    /// Fetches every page for `registry_address`.
    ///
    /// Never fails: a failed page ends the loop and is reported through
    /// [`FetchStatus::Interrupted`] next to the records gathered before it.
    pub async fn fetch_all(&self, registry_address: &str) -> FetchOutcome {
        let mut request =
            PageRequest::first(registry_address, self.statuses.clone(), self.page_size);
        let mut records = Vec::new();
        let mut pages = 0;

        let status = loop {
            if let Some(max_pages) = self.max_pages.filter(|max| pages >= *max) {
                tracing::warn!(
                    registry_address,
                    max_pages,
                    records = records.len(),
                    "Page limit reached before the end of the list, result may be truncated"
                );
                break FetchStatus::Truncated { max_pages };
            }

            pages += 1;
            let page = match self.source.fetch_page(&request).await {
                Ok(page) => page,
                Err(error) => {
                    tracing::warn!(
                        registry_address,
                        offset = request.offset,
                        records = records.len(),
                        %error,
                        "Failed to fetch page, keeping the records fetched so far"
                    );
                    break FetchStatus::Interrupted {
                        offset: request.offset,
                        error,
                    };
                }
            };

            let page_len = page.len();
            records.extend(page);

            if page_len < self.page_size as usize {
                break FetchStatus::Complete;
            }

            request.advance();
            tracing::info!(
                registry_address,
                offset = request.offset,
                records = records.len(),
                "Fetching next page"
            );
        };

        tracing::debug!(
            registry_address,
            pages,
            records = records.len(),
            %status,
            "Finished paginating"
        );

        FetchOutcome {
            records,
            pages,
            status,
        }
    }
}
