use std::sync::Arc;

use pastequeue_lib::commands::{Command, Response};
use pastequeue_lib::storage::MemoryStore;
use pastequeue_lib::PasteQueue;
use pretty_assertions::assert_eq;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn memory_app() -> PasteQueue {
    PasteQueue::start(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn paste_undo_paste_through_the_queue() {
    let app = memory_app();
    let router = app.router();

    assert!(router.replace(strings(&["alpha", "beta", "gamma"])).await.unwrap());
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("alpha"));
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("beta"));
    assert!(router.undo().await.unwrap());
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("beta"));
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("gamma"));
    assert_eq!(router.paste().await.unwrap(), None);

    app.shutdown().await;
}

#[tokio::test]
async fn empty_queue_has_nothing_to_paste_or_rewind() {
    let app = memory_app();
    let router = app.router();

    router.replace(Vec::new()).await.unwrap();
    assert_eq!(
        router.request(Command::Paste).await.unwrap(),
        Response::Text { success: false, text: None }
    );
    assert_eq!(
        router.request(Command::Undo).await.unwrap(),
        Response::Ack { success: false }
    );
}

#[tokio::test]
async fn rewind_stops_at_the_front() {
    let app = memory_app();
    let router = app.router();

    router.replace(strings(&["x"])).await.unwrap();
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("x"));
    assert!(router.undo().await.unwrap());
    assert!(!router.undo().await.unwrap());
    assert_eq!(router.pending().await.unwrap(), strings(&["x"]));
}

#[tokio::test]
async fn loading_a_snapshot_replaces_the_live_queue() {
    let app = memory_app();
    let router = app.router();
    let panel = app.control_panel();

    router.replace(strings(&["a", "b"])).await.unwrap();
    panel.save_snapshot("work").await.unwrap();
    router.replace(strings(&["c"])).await.unwrap();
    router.paste().await.unwrap();

    panel.load_snapshot("work").await.unwrap();
    assert_eq!(router.pending().await.unwrap(), strings(&["a", "b"]));
    assert_eq!(router.peek_next().await.unwrap().as_deref(), Some("a"));
}

#[tokio::test]
async fn replace_always_resets_the_cursor() {
    let app = memory_app();
    let router = app.router();

    router.replace(strings(&["a", "b", "c"])).await.unwrap();
    router.paste().await.unwrap();
    router.paste().await.unwrap();
    router.replace(strings(&["a", "b", "c"])).await.unwrap();
    assert_eq!(router.pending().await.unwrap(), strings(&["a", "b", "c"]));
}
