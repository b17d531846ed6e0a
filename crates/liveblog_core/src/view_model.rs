use crate::{BlogStatus, PollingState, PostOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetViewModel {
    pub order: PostOrder,
    pub highlights_only: bool,
    pub loading: bool,
    pub finished: bool,
    pub can_load_more: bool,
    pub sticky_visible: bool,
    pub pending_posts: usize,
    pub pending_sticky_posts: usize,
    /// Buffered batches of both segments, removals included.
    pub pending_batches: usize,
    pub blog_status: BlogStatus,
    pub polling: PollingState,
    /// Live events on the timeline; filled in by whoever owns the view.
    pub timeline_events: usize,
    pub dirty: bool,
}

impl Default for WidgetViewModel {
    fn default() -> Self {
        crate::WidgetState::default().view()
    }
}

impl WidgetViewModel {
    pub fn has_pending(&self) -> bool {
        self.pending_batches > 0
    }
}
