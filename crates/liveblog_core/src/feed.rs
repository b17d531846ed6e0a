use serde::{Deserialize, Serialize};

use crate::Post;

/// Page size of the sticky segment, independent of settings.
pub const STICKY_POSTS_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrder {
    #[default]
    Editorial,
    NewestFirst,
    OldestFirst,
}

impl PostOrder {
    /// Sort menu entries, in display order.
    pub const ALL: [PostOrder; 3] = [
        PostOrder::Editorial,
        PostOrder::NewestFirst,
        PostOrder::OldestFirst,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PostOrder::Editorial => "Editorial",
            PostOrder::NewestFirst => "Newest first",
            PostOrder::OldestFirst => "Oldest first",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostOrder::Editorial => "editorial",
            PostOrder::NewestFirst => "newest_first",
            PostOrder::OldestFirst => "oldest_first",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == raw.trim())
    }
}

/// One of the two disjoint post streams rendered into the shared timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Primary,
    Sticky,
}

impl Segment {
    pub const ALL: [Segment; 2] = [Segment::Primary, Segment::Sticky];

    pub fn page_size(self, posts_per_page: u32) -> u32 {
        match self {
            Segment::Primary => posts_per_page,
            Segment::Sticky => STICKY_POSTS_PER_PAGE,
        }
    }
}

/// A value held once per segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segments<T> {
    pub primary: T,
    pub sticky: T,
}

impl<T> Segments<T> {
    pub fn new(primary: T, sticky: T) -> Self {
        Self { primary, sticky }
    }

    pub fn get(&self, segment: Segment) -> &T {
        match segment {
            Segment::Primary => &self.primary,
            Segment::Sticky => &self.sticky,
        }
    }

    pub fn get_mut(&mut self, segment: Segment) -> &mut T {
        match segment {
            Segment::Primary => &mut self.primary,
            Segment::Sticky => &mut self.sticky,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    #[serde(rename = "max_results")]
    pub page_size: u64,
    pub page: u64,
}

impl PageMeta {
    /// True when no further page exists after this one.
    pub fn is_last_page(&self) -> bool {
        self.total <= self.page_size.saturating_mul(self.page)
    }
}

/// One page of posts together with its paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub items: Vec<Post>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Open,
    Closed,
    #[serde(other)]
    Other,
}

/// Feed-level metadata fetched by the status poll.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlogInfo {
    #[serde(default)]
    pub blog_status: BlogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
