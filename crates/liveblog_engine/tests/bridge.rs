use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use liveblog_engine::{Debouncer, LoadMoreBridge, LOAD_MORE_DEBOUNCE, LOAD_MORE_SIGNAL};

fn counting_bridge() -> (Arc<AtomicUsize>, LoadMoreBridge) {
    let fired = Arc::new(AtomicUsize::new(0));
    let inner = fired.clone();
    let bridge = LoadMoreBridge::new(LOAD_MORE_DEBOUNCE, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    });
    (fired, bridge)
}

#[tokio::test(start_paused = true)]
async fn burst_of_signals_fires_once() {
    let (fired, bridge) = counting_bridge();

    assert!(bridge.receive(LOAD_MORE_SIGNAL));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(bridge.receive(LOAD_MORE_SIGNAL));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(bridge.receive(LOAD_MORE_SIGNAL));

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0, "quiet period restarts");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn separated_signals_fire_separately() {
    let (fired, bridge) = counting_bridge();

    bridge.receive(LOAD_MORE_SIGNAL);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    bridge.receive(LOAD_MORE_SIGNAL);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn other_payloads_are_ignored() {
    let (fired, bridge) = counting_bridge();

    assert!(!bridge.receive("resize"));
    assert!(!bridge.receive("loadmore"));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn clones_share_one_debounce() {
    let fired = Arc::new(AtomicUsize::new(0));
    let inner = fired.clone();
    let debouncer = Debouncer::spawn(Duration::from_millis(100), move || {
        inner.fetch_add(1, Ordering::SeqCst);
    });
    let other = debouncer.clone();

    debouncer.signal();
    other.signal();
    debouncer.signal();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
