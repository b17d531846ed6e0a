use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use liveblog_engine::PollScheduler;

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    (count, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test(start_paused = true)]
async fn status_poll_runs_three_times_slower() {
    let (content, on_content) = counter();
    let (status, on_status) = counter();
    let scheduler = PollScheduler::start(Duration::from_secs(10), on_content, on_status);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(content.load(Ordering::SeqCst), 0, "no tick at start");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(content.load(Ordering::SeqCst), 3);
    assert_eq!(status.load(Ordering::SeqCst), 1);
    assert!(!scheduler.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_both_polls_and_is_idempotent() {
    let (content, on_content) = counter();
    let (status, on_status) = counter();
    let scheduler = PollScheduler::start(Duration::from_secs(10), on_content, on_status);

    tokio::time::sleep(Duration::from_secs(31)).await;
    scheduler.stop();
    scheduler.stop();
    assert!(scheduler.is_stopped());

    let content_before = content.load(Ordering::SeqCst);
    let status_before = status.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(content.load(Ordering::SeqCst), content_before);
    assert_eq!(status.load(Ordering::SeqCst), status_before);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_stops_polling() {
    let (content, on_content) = counter();
    let scheduler = PollScheduler::start(Duration::from_secs(10), on_content, || {});
    tokio::time::sleep(Duration::from_secs(11)).await;
    drop(scheduler);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(content.load(Ordering::SeqCst), 1);
}
