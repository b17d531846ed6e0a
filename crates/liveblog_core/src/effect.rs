use crate::{Post, PostOrder, Segment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchNextPage { segment: Segment },
    ChangeOrder { segment: Segment, order: PostOrder },
    ChangeHighlights { segment: Segment, highlights_only: bool },
    Reconcile { segment: Segment, posts: Vec<Post> },
    /// Reconcile after dropping the segment's events missing from `posts`.
    Resync { segment: Segment, posts: Vec<Post> },
    /// Remove every event the segment owns.
    ClearSegment { segment: Segment },
    ResolvePermalink,
    ScrollTo { element_id: String },
    StartPolling,
    StopPolling,
}
