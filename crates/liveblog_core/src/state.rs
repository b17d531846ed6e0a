use crate::view_model::WidgetViewModel;
use crate::{
    BlogStatus, PageMeta, PendingUpdates, PostOrder, Segment, Segments, UpdatePolicy,
    WidgetSettings,
};

/// Sort order, filter, and paging flags of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    pub order: PostOrder,
    pub highlights_only: bool,
    pub loading: bool,
    pub finished: bool,
}

impl ModeState {
    pub fn new(order: PostOrder) -> Self {
        Self {
            order,
            highlights_only: false,
            loading: true,
            finished: false,
        }
    }

    pub fn is_allowed_to_load_more(&self) -> bool {
        !self.loading && !self.finished
    }

    fn begin_reload(&mut self) {
        self.loading = true;
        self.finished = false;
    }

    fn complete_page(&mut self, meta: &PageMeta) {
        self.loading = false;
        self.finished = meta.is_last_page();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollingState {
    #[default]
    NotStarted,
    Running,
    /// The feed closed; polling never restarts.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    mode: ModeState,
    sticky_visible: bool,
    policies: Segments<UpdatePolicy>,
    pending: Segments<PendingUpdates>,
    blog_status: BlogStatus,
    polling: PollingState,
    first_page_loaded: bool,
    sticky_requested: bool,
    dirty: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(&WidgetSettings::default(), BlogStatus::Open)
    }
}

impl WidgetState {
    pub fn new(settings: &WidgetSettings, blog_status: BlogStatus) -> Self {
        Self {
            mode: ModeState::new(settings.post_order),
            sticky_visible: true,
            policies: settings.update_policies(),
            pending: Segments::default(),
            blog_status,
            polling: PollingState::NotStarted,
            first_page_loaded: false,
            sticky_requested: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> WidgetViewModel {
        WidgetViewModel {
            order: self.mode.order,
            highlights_only: self.mode.highlights_only,
            loading: self.mode.loading,
            finished: self.mode.finished,
            can_load_more: self.mode.is_allowed_to_load_more(),
            sticky_visible: self.sticky_visible,
            pending_posts: self.pending.primary.post_count(),
            pending_sticky_posts: self.pending.sticky.post_count(),
            pending_batches: self.pending.primary.batch_count()
                + self.pending.sticky.batch_count(),
            blog_status: self.blog_status,
            polling: self.polling,
            timeline_events: 0,
            dirty: self.dirty,
        }
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn is_allowed_to_load_more(&self) -> bool {
        self.mode.is_allowed_to_load_more()
    }

    pub fn sticky_visible(&self) -> bool {
        self.sticky_visible
    }

    pub fn blog_status(&self) -> BlogStatus {
        self.blog_status
    }

    pub fn polling(&self) -> PollingState {
        self.polling
    }

    pub fn first_page_loaded(&self) -> bool {
        self.first_page_loaded
    }

    /// Whether pages and updates of `segment` reach the timeline.
    pub fn shows(&self, segment: Segment) -> bool {
        match segment {
            Segment::Primary => true,
            Segment::Sticky => self.sticky_visible,
        }
    }

    pub fn policy(&self, segment: Segment) -> UpdatePolicy {
        *self.policies.get(segment)
    }

    pub fn pending(&self, segment: Segment) -> &PendingUpdates {
        self.pending.get(segment)
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_page_fetch(&mut self) {
        self.mode.loading = true;
        self.mark_dirty();
    }

    pub(crate) fn complete_page(&mut self, meta: &PageMeta) {
        self.mode.complete_page(meta);
        self.mark_dirty();
    }

    pub(crate) fn stop_loading(&mut self) {
        self.mode.loading = false;
        self.mark_dirty();
    }

    pub(crate) fn set_order(&mut self, order: PostOrder) {
        self.mode.order = order;
        self.mode.begin_reload();
        self.mark_dirty();
    }

    /// Flips the filter and returns the new value.
    pub(crate) fn toggle_highlights(&mut self) -> bool {
        self.mode.highlights_only = !self.mode.highlights_only;
        self.mode.begin_reload();
        if self.mode.highlights_only {
            self.sticky_visible = true;
        }
        self.mark_dirty();
        self.mode.highlights_only
    }

    /// Flips sticky visibility and returns the new value.
    pub(crate) fn toggle_sticky_visible(&mut self) -> bool {
        self.sticky_visible = !self.sticky_visible;
        self.mark_dirty();
        self.sticky_visible
    }

    /// Returns true the first time the sticky segment's page one is asked for.
    pub(crate) fn claim_sticky_first_page(&mut self) -> bool {
        !std::mem::replace(&mut self.sticky_requested, true)
    }

    pub(crate) fn mark_first_page_loaded(&mut self) -> bool {
        let first = !self.first_page_loaded;
        self.first_page_loaded = true;
        first
    }

    pub(crate) fn start_polling(&mut self) -> bool {
        if self.polling != PollingState::NotStarted || self.blog_status == BlogStatus::Closed {
            return false;
        }
        self.polling = PollingState::Running;
        self.mark_dirty();
        true
    }

    /// Records the feed status; returns true when polling must stop now.
    pub(crate) fn set_blog_status(&mut self, status: BlogStatus) -> bool {
        if self.blog_status != status {
            self.blog_status = status;
            self.mark_dirty();
        }
        if status == BlogStatus::Closed && self.polling == PollingState::Running {
            self.polling = PollingState::Stopped;
            self.mark_dirty();
            return true;
        }
        false
    }

    pub(crate) fn buffer_update(&mut self, segment: Segment, posts: Vec<crate::Post>) {
        self.pending.get_mut(segment).push(posts);
        self.mark_dirty();
    }

    pub(crate) fn drain_pending(&mut self, segment: Segment) -> Vec<Vec<crate::Post>> {
        let batches = self.pending.get_mut(segment).drain();
        if !batches.is_empty() {
            self.mark_dirty();
        }
        batches
    }
}
