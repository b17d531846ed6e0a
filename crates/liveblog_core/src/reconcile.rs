//! Keeps a timeline view in step with batches of posts.
//!
//! The reconciler owns the view and a map from post identity to the handle
//! the view returned for that post's event. Each pass compares an incoming
//! batch against that map only, never against an earlier batch.

use std::collections::{HashMap, HashSet};

use feed_logging::{feed_debug, feed_error};

use crate::{EventProjector, Post, PostId, Segment, Segments, TimelineEvent};

/// Opaque reference to an event inside a [`TimelineView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHandle(u64);

impl ViewHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The rendering widget the timeline is drawn into.
///
/// `construct` is called at most once, with at least one event, and returns
/// one handle per event in the same order.
pub trait TimelineView {
    fn construct(&mut self, events: Vec<TimelineEvent>) -> Vec<ViewHandle>;
    fn add(&mut self, event: TimelineEvent) -> ViewHandle;
    fn remove_by_handle(&mut self, handle: ViewHandle);
    /// Bring the element with this id into view. Views without scrolling ignore it.
    fn scroll_to(&mut self, _element_id: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentPhase {
    #[default]
    Uninitialized,
    Populated,
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub constructed: bool,
    pub added: usize,
    pub replaced: usize,
    pub removed: usize,
    pub ignored: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.constructed || self.added + self.replaced + self.removed > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    segment: Segment,
    handle: ViewHandle,
}

pub struct Reconciler<V> {
    view: V,
    projector: EventProjector,
    constructed: bool,
    entries: HashMap<PostId, Entry>,
    phases: Segments<SegmentPhase>,
}

impl<V: TimelineView> Reconciler<V> {
    pub fn new(view: V, projector: EventProjector) -> Self {
        Self {
            view,
            projector,
            constructed: false,
            entries: HashMap::new(),
            phases: Segments::default(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn phase(&self, segment: Segment) -> SegmentPhase {
        *self.phases.get(segment)
    }

    /// Number of live events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PostId) -> bool {
        self.entries.contains_key(id)
    }

    /// Segment currently responsible for the event of `id`.
    pub fn owner(&self, id: &PostId) -> Option<Segment> {
        self.entries.get(id).map(|entry| entry.segment)
    }

    /// Apply one batch of posts considered current truth for `segment`.
    pub fn reconcile(&mut self, segment: Segment, posts: &[Post]) -> ReconcileReport {
        let report = if self.constructed {
            self.apply(segment, posts)
        } else {
            self.construct(segment, posts)
        };
        if self.constructed {
            *self.phases.get_mut(segment) = SegmentPhase::Populated;
        }
        feed_debug!(
            "Reconciled {:?} batch of {}: constructed={} added={} replaced={} removed={} ignored={}",
            segment,
            posts.len(),
            report.constructed,
            report.added,
            report.replaced,
            report.removed,
            report.ignored
        );
        report
    }

    /// Like [`reconcile`](Self::reconcile), but first drops the segment's
    /// events whose post is absent from `posts`.
    pub fn resync(&mut self, segment: Segment, posts: &[Post]) -> ReconcileReport {
        let keep: HashSet<PostId> = posts.iter().map(|post| post.id.clone()).collect();
        let dropped = self.drop_where(segment, |id| !keep.contains(id));

        let mut report = self.reconcile(segment, posts);
        report.removed += dropped;
        report
    }

    /// Remove every event owned by `segment`. The view stays constructed.
    pub fn clear_segment(&mut self, segment: Segment) -> usize {
        let dropped = self.drop_where(segment, |_| true);
        feed_debug!("Cleared {} {:?} events", dropped, segment);
        dropped
    }

    fn drop_where(&mut self, segment: Segment, mut stale: impl FnMut(&PostId) -> bool) -> usize {
        let doomed: Vec<PostId> = self
            .entries
            .iter()
            .filter(|(id, entry)| entry.segment == segment && stale(id))
            .map(|(id, _)| id.clone())
            .collect();

        let mut dropped = 0;
        for id in doomed {
            if let Some(entry) = self.entries.remove(&id) {
                self.view.remove_by_handle(entry.handle);
                dropped += 1;
            }
        }
        dropped
    }

    fn construct(&mut self, segment: Segment, posts: &[Post]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // Later duplicates win, at the position of the first occurrence.
        let mut seeds: Vec<Option<&Post>> = Vec::with_capacity(posts.len());
        let mut positions: HashMap<&PostId, usize> = HashMap::new();
        for post in posts {
            match (positions.get(&post.id).copied(), post.is_visible()) {
                (Some(index), true) => seeds[index] = Some(post),
                (Some(index), false) => seeds[index] = None,
                (None, true) => {
                    positions.insert(&post.id, seeds.len());
                    seeds.push(Some(post));
                }
                (None, false) => report.ignored += 1,
            }
        }
        let seeds: Vec<&Post> = seeds.into_iter().flatten().collect();

        if seeds.is_empty() {
            feed_debug!("No visible {:?} posts yet, timeline not constructed", segment);
            return report;
        }

        let events: Vec<TimelineEvent> = seeds
            .iter()
            .map(|post| self.projector.project(post))
            .collect();
        let handles = self.view.construct(events);
        if handles.len() != seeds.len() {
            feed_error!(
                "Timeline returned {} handles for {} events",
                handles.len(),
                seeds.len()
            );
        }
        for (post, handle) in seeds.iter().zip(handles) {
            self.entries
                .insert(post.id.clone(), Entry { segment, handle });
            report.added += 1;
        }

        self.constructed = true;
        report.constructed = true;
        report
    }

    fn apply(&mut self, segment: Segment, posts: &[Post]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for post in posts {
            let existing = self.entries.remove(&post.id);
            match (existing, post.is_visible()) {
                (None, true) => {
                    self.add(segment, post);
                    report.added += 1;
                }
                (Some(entry), false) => {
                    self.view.remove_by_handle(entry.handle);
                    report.removed += 1;
                }
                // Any change to a live post is an edit, sticky flips included.
                (Some(entry), true) => {
                    self.view.remove_by_handle(entry.handle);
                    self.add(segment, post);
                    report.replaced += 1;
                }
                (None, false) => report.ignored += 1,
            }
        }
        report
    }

    fn add(&mut self, segment: Segment, post: &Post) {
        let handle = self.view.add(self.projector.project(post));
        self.entries
            .insert(post.id.clone(), Entry { segment, handle });
    }
}
