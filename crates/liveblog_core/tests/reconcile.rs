use std::collections::BTreeMap;
use std::sync::Once;

use liveblog_core::{
    EventProjector, Post, PostId, PostItem, PostStatus, Reconciler, Segment, SegmentPhase,
    TimelineEvent, TimelineView, ViewHandle,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feed_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ViewOp {
    Construct(Vec<String>),
    Add(String),
    Remove(u64),
}

#[derive(Debug, Default)]
struct RecordingView {
    next_handle: u64,
    live: BTreeMap<u64, TimelineEvent>,
    ops: Vec<ViewOp>,
}

impl RecordingView {
    fn issue(&mut self, event: TimelineEvent) -> ViewHandle {
        self.next_handle += 1;
        self.live.insert(self.next_handle, event);
        ViewHandle::new(self.next_handle)
    }

    fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .live
            .values()
            .map(|event| event.post_id.to_string())
            .collect();
        ids.sort();
        ids
    }

    fn text_of(&self, id: &str) -> Vec<String> {
        self.live
            .values()
            .filter(|event| event.post_id.as_str() == id)
            .map(|event| event.text.clone())
            .collect()
    }

    fn constructs(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ViewOp::Construct(_)))
            .count()
    }
}

impl TimelineView for RecordingView {
    fn construct(&mut self, events: Vec<TimelineEvent>) -> Vec<ViewHandle> {
        self.ops.push(ViewOp::Construct(
            events.iter().map(|event| event.post_id.to_string()).collect(),
        ));
        events.into_iter().map(|event| self.issue(event)).collect()
    }

    fn add(&mut self, event: TimelineEvent) -> ViewHandle {
        self.ops.push(ViewOp::Add(event.post_id.to_string()));
        self.issue(event)
    }

    fn remove_by_handle(&mut self, handle: ViewHandle) {
        self.ops.push(ViewOp::Remove(handle.raw()));
        self.live.remove(&handle.raw());
    }
}

fn reconciler() -> Reconciler<RecordingView> {
    init_logging();
    Reconciler::new(RecordingView::default(), EventProjector::default())
}

fn post(id: &str, texts: &[&str]) -> Post {
    let mut post = Post::open(id);
    post.items = texts.iter().map(|text| PostItem::new(*text)).collect();
    post.published_date = Some("2016-05-10T12:30:00+00:00".to_string());
    post
}

fn closed(id: &str) -> Post {
    let mut post = post(id, &[]);
    post.status = PostStatus::Other;
    post
}

fn deleted(id: &str) -> Post {
    let mut post = post(id, &["gone"]);
    post.deleted = true;
    post
}

#[test]
fn first_batch_constructs_the_view() {
    let mut rec = reconciler();
    let report = rec.reconcile(Segment::Primary, &[post("1", &["a"])]);

    assert!(report.constructed);
    assert_eq!(report.added, 1);
    assert!(rec.is_constructed());
    assert_eq!(rec.view().live_ids(), vec!["1"]);
    assert_eq!(rec.view().text_of("1"), vec!["a"]);
    assert_eq!(rec.phase(Segment::Primary), SegmentPhase::Populated);
}

#[test]
fn view_is_never_constructed_from_zero_events() {
    let mut rec = reconciler();
    let report = rec.reconcile(Segment::Primary, &[closed("1"), deleted("2")]);

    assert!(!report.constructed);
    assert_eq!(report.ignored, 2);
    assert!(!rec.is_constructed());
    assert_eq!(rec.view().constructs(), 0);
    assert_eq!(rec.phase(Segment::Primary), SegmentPhase::Uninitialized);

    let report = rec.reconcile(Segment::Primary, &[]);
    assert!(!report.changed());
    assert_eq!(rec.view().constructs(), 0);

    rec.reconcile(Segment::Primary, &[post("3", &["x"])]);
    assert_eq!(rec.view().constructs(), 1);
    assert_eq!(rec.view().live_ids(), vec!["3"]);
}

#[test]
fn construction_keeps_input_order_and_skips_hidden_posts() {
    let mut rec = reconciler();
    rec.reconcile(
        Segment::Primary,
        &[post("b", &["1"]), closed("c"), post("a", &["2"]), deleted("d")],
    );
    assert_eq!(
        rec.view().ops,
        vec![ViewOp::Construct(vec!["b".to_string(), "a".to_string()])]
    );
}

#[test]
fn duplicate_identities_in_the_first_batch_collapse() {
    let mut rec = reconciler();
    rec.reconcile(
        Segment::Primary,
        &[post("1", &["old"]), post("2", &["x"]), post("1", &["new"])],
    );
    assert_eq!(rec.len(), 2);
    assert_eq!(rec.view().text_of("1"), vec!["new"]);

    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"]), deleted("1")]);
    assert!(!rec.is_constructed());
}

#[test]
fn edited_post_is_replaced() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("5", &["a"])]);

    let report = rec.reconcile(Segment::Primary, &[post("5", &["b", "c"])]);

    assert_eq!(report.replaced, 1);
    assert_eq!(rec.view().text_of("5"), vec!["b<br />c"]);
    assert_eq!(rec.len(), 1);
    assert_eq!(
        rec.view().ops[1..].to_vec(),
        vec![ViewOp::Remove(1), ViewOp::Add("5".to_string())]
    );
}

#[test]
fn sticky_flip_alone_is_treated_as_an_edit() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("7", &["a"])]);

    let mut pinned = post("7", &["a"]);
    pinned.sticky = true;
    let report = rec.reconcile(Segment::Primary, &[pinned]);

    assert_eq!(report.replaced, 1);
    assert_eq!(rec.len(), 1);
}

#[test]
fn closed_post_is_removed_without_replacement() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("9", &["a"]), post("10", &["b"])]);

    let report = rec.reconcile(Segment::Primary, &[closed("9")]);

    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 0);
    assert!(!rec.contains(&PostId::from("9")));
    assert_eq!(rec.view().live_ids(), vec!["10"]);
}

#[test]
fn deleted_post_is_removed() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"])]);
    rec.reconcile(Segment::Primary, &[deleted("1")]);
    assert!(rec.is_empty());
    assert!(rec.view().live.is_empty());
}

#[test]
fn unknown_hidden_post_is_a_noop() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"])]);
    let ops_before = rec.view().ops.len();

    let report = rec.reconcile(Segment::Primary, &[closed("2"), deleted("3")]);

    assert_eq!(report.ignored, 2);
    assert_eq!(rec.view().ops.len(), ops_before);
}

#[test]
fn new_post_after_construction_is_added() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"])]);
    let report = rec.reconcile(Segment::Primary, &[post("2", &["b"])]);

    assert_eq!(report.added, 1);
    assert_eq!(rec.view().live_ids(), vec!["1", "2"]);
    assert_eq!(rec.view().constructs(), 1);
}

#[test]
fn reconciling_the_same_batch_twice_keeps_membership() {
    let mut rec = reconciler();
    let batch = vec![post("1", &["a"]), closed("2"), post("3", &["c"]), deleted("4")];

    rec.reconcile(Segment::Primary, &batch);
    let first = rec.view().live_ids();
    rec.reconcile(Segment::Primary, &batch);

    assert_eq!(rec.view().live_ids(), first);
    assert_eq!(first, vec!["1", "3"]);
}

#[test]
fn one_event_per_identity_across_segments() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"]), post("2", &["b"])]);

    let mut pinned = post("2", &["b"]);
    pinned.sticky = true;
    rec.reconcile(Segment::Sticky, &[pinned, post("s", &["pin"])]);

    assert_eq!(rec.view().live_ids(), vec!["1", "2", "s"]);
    assert_eq!(rec.owner(&PostId::from("2")), Some(Segment::Sticky));
    assert_eq!(rec.owner(&PostId::from("1")), Some(Segment::Primary));
    assert_eq!(rec.phase(Segment::Sticky), SegmentPhase::Populated);
    assert_eq!(rec.view().constructs(), 1);
}

#[test]
fn sticky_segment_can_construct_the_shared_view() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[]);
    rec.reconcile(Segment::Sticky, &[post("s", &["pin"])]);
    assert!(rec.is_constructed());
    assert_eq!(rec.phase(Segment::Primary), SegmentPhase::Uninitialized);

    rec.reconcile(Segment::Primary, &[post("1", &["a"])]);
    assert_eq!(rec.view().constructs(), 1);
    assert_eq!(rec.view().live_ids(), vec!["1", "s"]);
    assert_eq!(rec.phase(Segment::Primary), SegmentPhase::Populated);
}

#[test]
fn resync_drops_only_absent_events_of_that_segment() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"]), post("2", &["b"])]);
    rec.reconcile(Segment::Sticky, &[post("s", &["pin"])]);

    let report = rec.resync(Segment::Primary, &[post("2", &["b"]), post("3", &["c"])]);

    assert_eq!(report.removed, 1);
    assert_eq!(report.replaced, 1);
    assert_eq!(report.added, 1);
    assert_eq!(rec.view().live_ids(), vec!["2", "3", "s"]);
}

#[test]
fn clearing_a_segment_keeps_the_other_and_the_view() {
    let mut rec = reconciler();
    rec.reconcile(Segment::Primary, &[post("1", &["a"])]);
    rec.reconcile(Segment::Sticky, &[post("s", &["pin"]), post("t", &["pin"])]);

    assert_eq!(rec.clear_segment(Segment::Sticky), 2);
    assert_eq!(rec.view().live_ids(), vec!["1"]);
    assert!(rec.is_constructed());
    assert_eq!(rec.owner(&PostId::from("s")), None);

    // Coming back adds, it never constructs a second time.
    let report = rec.resync(Segment::Sticky, &[post("s", &["pin"])]);
    assert!(!report.constructed);
    assert_eq!(report.added, 1);
    assert_eq!(rec.view().constructs(), 1);
    assert_eq!(rec.view().live_ids(), vec!["1", "s"]);
}

#[test]
fn malformed_date_still_renders_text() {
    let mut rec = reconciler();
    let mut bad = post("1", &["a"]);
    bad.published_date = Some("not a date".to_string());

    rec.reconcile(Segment::Primary, &[bad]);

    let event = rec.view().live.values().next().unwrap();
    assert_eq!(event.text, "a");
    assert_eq!(event.start_date, None);
    assert_eq!(event.display_date, None);
}
