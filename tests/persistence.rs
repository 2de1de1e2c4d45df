use pastequeue_lib::storage::{KeyValueStore, SqliteStore};
use pastequeue_lib::PasteQueue;
use pretty_assertions::assert_eq;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn restart_restores_queue_with_cursor_at_start() {
    let dir = tempfile::tempdir().unwrap();

    let app = PasteQueue::open(dir.path()).unwrap();
    let router = app.router();
    router.replace(strings(&["one", "two"])).await.unwrap();
    assert_eq!(router.paste().await.unwrap().as_deref(), Some("one"));
    drop(router);
    app.shutdown().await;

    // Items pasted before the restart are offered again
    let app = PasteQueue::open(dir.path()).unwrap();
    assert_eq!(app.router().pending().await.unwrap(), strings(&["one", "two"]));
    app.shutdown().await;
}

#[tokio::test]
async fn enabled_flag_and_snapshots_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let app = PasteQueue::open(dir.path()).unwrap();
    let panel = app.control_panel();
    app.router().replace(strings(&["s1", "s2"])).await.unwrap();
    panel.save_snapshot("later").await.unwrap();
    panel.set_enabled(false).unwrap();
    drop(panel);
    app.shutdown().await;

    let app = PasteQueue::open(dir.path()).unwrap();
    let panel = app.control_panel();
    assert!(!panel.is_enabled());
    assert_eq!(panel.snapshot_names().unwrap(), strings(&["later"]));
    app.shutdown().await;

    // Layout: one key per snapshot next to the live queue and the flag
    let kv = SqliteStore::open(dir.path()).unwrap();
    assert_eq!(kv.get("pasteQueue").unwrap().as_deref(), Some(r#"["s1","s2"]"#));
    assert_eq!(kv.get("enabled").unwrap().as_deref(), Some("false"));
    assert_eq!(kv.get("snapshot:later").unwrap().as_deref(), Some(r#"["s1","s2"]"#));
}
