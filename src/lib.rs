//! PasteQueue - Replay a queue of text snippets in place of paste
//!
//! Holds the paste queue for a browser extension: pages consume items one at
//! a time on paste, undo puts the last item back, and the control panel edits
//! the queue and its named snapshots.

pub mod agent;
pub mod commands;
pub mod config;
pub mod host;
pub mod panel;
pub mod queue;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;

use agent::{ClipboardSink, PageAgent};
use commands::{CommandRouter, RouterHandle};
use config::{EnabledFlag, Settings};
use panel::ControlPanel;
use queue::QueueCoordinator;
use storage::{KeyValueStore, QueueStore, SqliteStore, StorageError};

/// A running queue service: the store, the router task and shared settings
pub struct PasteQueue {
    store: QueueStore,
    settings: Settings,
    enabled: EnabledFlag,
    router: RouterHandle,
    task: JoinHandle<()>,
}

impl PasteQueue {
    /// Open the SQLite store in `data_dir` and start the router.
    /// Must be called from within a tokio runtime.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        let kv = SqliteStore::open(data_dir)?;
        Ok(Self::start(Arc::new(kv)))
    }

    /// Start on an arbitrary key/value store
    pub fn start(kv: Arc<dyn KeyValueStore>) -> Self {
        let store = QueueStore::new(kv);
        let settings = Settings::load(&store);
        let enabled = EnabledFlag::load(store.clone());
        let (router, task) = CommandRouter::spawn(QueueCoordinator::load(store.clone()));

        log::info!("PasteQueue started (enabled: {})", enabled.get());
        Self {
            store,
            settings,
            enabled,
            router,
            task,
        }
    }

    pub fn router(&self) -> RouterHandle {
        self.router.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> QueueStore {
        self.store.clone()
    }

    pub fn control_panel(&self) -> ControlPanel {
        ControlPanel::new(self.router(), self.store(), self.enabled.clone())
    }

    /// Agent for one page, falling back to the system clipboard
    pub fn page_agent(&self) -> PageAgent {
        PageAgent::new(self.router(), self.enabled.clone(), &self.settings)
            .with_fallback(Box::new(ClipboardSink))
    }

    /// Stop the router after queued requests and flush the store
    pub async fn shutdown(self) {
        self.router.shutdown().await;
        if let Err(e) = self.task.await {
            log::error!("Router task failed: {}", e);
        }
        log::info!("PasteQueue stopped");
    }
}

/// Initialize logger
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Native messaging host entry point
pub fn run() {
    init_logging();
    log::info!("PasteQueue host starting...");

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve_stdio()) {
        log::error!("Host stopped with error: {}", e);
        std::process::exit(1);
    }
}

async fn serve_stdio() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config::data_dir();
    log::info!("Data directory: {:?}", data_dir);

    let app = PasteQueue::open(&data_dir)?;
    let router = app.router();
    let result = host::serve(&router, &mut tokio::io::stdin(), &mut tokio::io::stdout()).await;
    drop(router);
    app.shutdown().await;
    Ok(result?)
}
