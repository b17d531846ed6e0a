use crate::{BlogInfo, Page, Post, PostOrder, Segment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Widget mounted; fetch the first page.
    Started,
    /// Reader scrolled to the end of the timeline.
    LoadMoreRequested,
    /// Debounced "load more" from the embedding page.
    LoadMoreSignalled,
    /// Reader picked a sort order.
    OrderSelected(PostOrder),
    /// Reader clicked the highlights switch.
    HighlightsToggled,
    /// Reader showed or hid pinned posts.
    StickyVisibilityToggled,
    /// Reader asked for the buffered updates.
    ApplyPendingClicked,
    /// Next page of a segment arrived.
    PageLoaded { segment: Segment, page: Page },
    /// Page fetch, or first-page reload, failed.
    PageFailed { segment: Segment, reason: String },
    /// Fresh first page after an order or filter change.
    FirstPageReloaded { segment: Segment, page: Page },
    /// Content poll returned for a segment.
    UpdatesFetched { segment: Segment, posts: Vec<Post> },
    /// Content poll failed for a segment.
    UpdatesFailed { segment: Segment, reason: String },
    /// Feed status poll returned.
    BlogFetched(BlogInfo),
    /// Feed status poll failed.
    BlogFetchFailed { reason: String },
    /// Permalink lookup finished; `None` when there is nothing to scroll to.
    PermalinkResolved(Option<String>),
}
