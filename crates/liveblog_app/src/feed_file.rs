//! A page source backed by a JSON file on disk.
//!
//! The file holds the whole feed as `{"_items": [...]}` and is re-read on
//! every request, so editing it while the app runs simulates editors
//! publishing, changing and closing posts.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};
use feed_logging::feed_debug;
use liveblog_core::{decode_posts, Page, PageMeta, Post, PostOrder, Segment};
use liveblog_engine::{FailureKind, PageSource, TransportError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(rename = "_items", default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug)]
struct Cursor {
    order: PostOrder,
    highlights_only: bool,
    next_page: u64,
    latest_seen: Option<DateTime<FixedOffset>>,
}

/// One segment's view of the feed file.
pub(crate) struct FilePageSource {
    path: PathBuf,
    segment: Segment,
    page_size: u64,
    cursor: Mutex<Cursor>,
}

impl FilePageSource {
    pub(crate) fn new(path: PathBuf, segment: Segment, page_size: u32, order: PostOrder) -> Self {
        Self {
            path,
            segment,
            page_size: u64::from(page_size),
            cursor: Mutex::new(Cursor {
                order,
                highlights_only: false,
                next_page: 1,
                latest_seen: None,
            }),
        }
    }

    async fn read_posts(&self) -> Result<Vec<Post>, TransportError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| {
                TransportError::new(
                    FailureKind::Network,
                    format!("{}: {}", self.path.display(), err),
                )
            })?;
        let document: FeedDocument = serde_json::from_str(&content)
            .map_err(|err| TransportError::new(FailureKind::Decode, err.to_string()))?;
        Ok(decode_posts(document.items))
    }

    fn in_segment(&self, post: &Post) -> bool {
        match self.segment {
            Segment::Primary => !post.sticky,
            Segment::Sticky => post.sticky,
        }
    }

    /// Visible posts of this segment under the current mode, in page order.
    fn listing(&self, posts: Vec<Post>, cursor: &Cursor) -> Vec<Post> {
        let mut listing: Vec<Post> = posts
            .into_iter()
            .filter(|post| post.is_visible() && self.in_segment(post))
            .filter(|post| !cursor.highlights_only || post.highlight)
            .collect();
        match cursor.order {
            PostOrder::Editorial => {}
            PostOrder::NewestFirst => {
                listing.sort_by_key(|post| std::cmp::Reverse(published(post)));
            }
            PostOrder::OldestFirst => listing.sort_by_key(published),
        }
        listing
    }

    fn page(&self, listing: Vec<Post>, number: u64) -> Page {
        let total = listing.len() as u64;
        let skip = usize::try_from(number.saturating_sub(1).saturating_mul(self.page_size))
            .unwrap_or(usize::MAX);
        let take = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        Page {
            items: listing.into_iter().skip(skip).take(take).collect(),
            meta: PageMeta {
                total,
                page_size: self.page_size,
                page: number,
            },
        }
    }

    /// Re-read the file and return page 1 under the mode `apply` sets.
    async fn restart(&self, apply: impl FnOnce(&mut Cursor)) -> Result<Page, TransportError> {
        let posts = self.read_posts().await?;
        let mut cursor = self.lock();
        apply(&mut cursor);
        cursor.next_page = 2;
        let listing = self.listing(posts, &cursor);
        Ok(self.page(listing, 1))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cursor> {
        self.cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl PageSource for FilePageSource {
    async fn fetch_next_page(&self) -> Result<Page, TransportError> {
        let posts = self.read_posts().await?;
        let mut cursor = self.lock();
        let number = cursor.next_page;
        cursor.next_page += 1;
        let listing = self.listing(posts, &cursor);
        feed_debug!("{:?} page {} from {}", self.segment, number, self.path.display());
        Ok(self.page(listing, number))
    }

    /// Posts of this segment stamped after the newest stamp seen so far.
    ///
    /// Hidden posts are reported to both segments so whichever one shows
    /// them can drop them.
    async fn retrieve_update(&self) -> Result<Vec<Post>, TransportError> {
        let posts = self.read_posts().await?;
        let cursor = self.lock();
        Ok(posts
            .into_iter()
            .filter(|post| !post.is_visible() || self.in_segment(post))
            .filter(|post| !cursor.highlights_only || post.highlight || !post.is_visible())
            .filter(|post| match (updated(post), cursor.latest_seen) {
                (Some(stamp), Some(latest)) => stamp > latest,
                (Some(_), None) => true,
                (None, _) => false,
            })
            .collect())
    }

    async fn set_order(&self, order: PostOrder) -> Result<Page, TransportError> {
        self.restart(|cursor| cursor.order = order).await
    }

    async fn set_highlights_only(&self, highlights_only: bool) -> Result<Page, TransportError> {
        self.restart(|cursor| cursor.highlights_only = highlights_only)
            .await
    }

    fn record_latest_seen(&self, posts: &[Post]) {
        let newest = posts.iter().filter_map(updated).max();
        let mut cursor = self.lock();
        if newest > cursor.latest_seen {
            cursor.latest_seen = newest;
        }
    }
}

fn updated(post: &Post) -> Option<DateTime<FixedOffset>> {
    post.updated
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

fn published(post: &Post) -> Option<DateTime<FixedOffset>> {
    post.published_date
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}
