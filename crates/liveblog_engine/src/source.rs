use liveblog_core::{BlogInfo, BlogStatus, Page, Post, PostOrder};

use crate::{PermalinkError, TransportError};

/// Paginated access to one segment of the remote feed.
///
/// Implementations own their cursor; `set_order` and `set_highlights_only`
/// reset it and return the new first page.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_next_page(&self) -> Result<Page, TransportError>;

    /// Posts created or changed since the latest recorded timestamps.
    async fn retrieve_update(&self) -> Result<Vec<Post>, TransportError>;

    async fn set_order(&self, order: PostOrder) -> Result<Page, TransportError>;

    async fn set_highlights_only(&self, highlights_only: bool) -> Result<Page, TransportError>;

    /// Remember the newest timestamps in `posts` to bound later update queries.
    fn record_latest_seen(&self, posts: &[Post]);
}

/// Feed-level metadata, polled for the open/closed status.
#[async_trait::async_trait]
pub trait BlogSource: Send + Sync {
    async fn fetch_blog(&self) -> Result<BlogInfo, TransportError>;
}

/// Finds the element a permalink in the host page points at.
#[async_trait::async_trait]
pub trait PermalinkResolver: Send + Sync {
    async fn resolve_target_id(&self) -> Result<String, PermalinkError>;
}

/// A blog source that always reports the same metadata.
#[derive(Debug, Clone, Default)]
pub struct StaticBlogSource {
    info: BlogInfo,
}

impl StaticBlogSource {
    pub fn new(info: BlogInfo) -> Self {
        Self { info }
    }

    pub fn with_status(blog_status: BlogStatus) -> Self {
        Self::new(BlogInfo {
            blog_status,
            title: None,
        })
    }
}

#[async_trait::async_trait]
impl BlogSource for StaticBlogSource {
    async fn fetch_blog(&self) -> Result<BlogInfo, TransportError> {
        Ok(self.info.clone())
    }
}

/// Resolver for pages that never carry a permalink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermalink;

#[async_trait::async_trait]
impl PermalinkResolver for NoPermalink {
    async fn resolve_target_id(&self) -> Result<String, PermalinkError> {
        Err(PermalinkError::NotPresent)
    }
}
