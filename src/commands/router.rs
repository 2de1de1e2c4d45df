//! PasteQueue - Command router
//!
//! Runs the queue coordinator on its own task. Requests arrive over a channel
//! and are handled one at a time, each answered through its own reply channel.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::handlers::{dispatch, Command, Response};
use crate::queue::QueueCoordinator;

/// Requests buffered before senders wait
const ROUTER_CAPACITY: usize = 64;

/// Router error type
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Command router is unavailable")]
    Unavailable,
}

enum Message {
    Request {
        command: Command,
        reply: oneshot::Sender<Response>,
    },
    Shutdown,
}

pub struct CommandRouter;

impl CommandRouter {
    /// Move the coordinator onto a router task
    ///
    /// The task ends on `RouterHandle::shutdown` or once every handle is
    /// dropped, and flushes the store before finishing.
    pub fn spawn(coordinator: QueueCoordinator) -> (RouterHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(ROUTER_CAPACITY);
        let task = tokio::spawn(Self::run(coordinator, rx));
        log::info!("[Router] Command router started");
        (RouterHandle { tx }, task)
    }

    async fn run(mut coordinator: QueueCoordinator, mut rx: mpsc::Receiver<Message>) {
        while let Some(message) = rx.recv().await {
            match message {
                Message::Request { command, reply } => {
                    let name = command.name();
                    let response = dispatch(&mut coordinator, command);
                    log::debug!("[Router] {} -> success={}", name, response.is_success());
                    if reply.send(response).is_err() {
                        log::debug!("[Router] Caller dropped before {} response", name);
                    }
                }
                Message::Shutdown => break,
            }
        }

        coordinator.close();
        log::info!("[Router] Command router stopped");
    }
}

/// Cloneable sender side of the router
#[derive(Clone)]
pub struct RouterHandle {
    tx: mpsc::Sender<Message>,
}

impl RouterHandle {
    /// Send one command and wait for its response
    pub async fn request(&self, command: Command) -> Result<Response, RouterError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Message::Request { command, reply })
            .await
            .map_err(|_| RouterError::Unavailable)?;
        response.await.map_err(|_| RouterError::Unavailable)
    }

    /// Pending items
    pub async fn pending(&self) -> Result<Vec<String>, RouterError> {
        match self.request(Command::GetPendingQueue).await? {
            Response::Queue { queue } => Ok(queue),
            _ => Ok(Vec::new()),
        }
    }

    pub async fn replace(&self, queue: Vec<String>) -> Result<bool, RouterError> {
        Ok(self.request(Command::ReplaceQueue { queue }).await?.is_success())
    }

    /// Consume the next item
    pub async fn paste(&self) -> Result<Option<String>, RouterError> {
        Ok(into_text(self.request(Command::Paste).await?))
    }

    /// Rewind one item
    pub async fn undo(&self) -> Result<bool, RouterError> {
        Ok(self.request(Command::Undo).await?.is_success())
    }

    pub async fn peek_next(&self) -> Result<Option<String>, RouterError> {
        Ok(into_text(self.request(Command::PeekNext).await?))
    }

    /// Ask the router task to stop after the requests already queued
    pub async fn shutdown(&self) {
        if self.tx.send(Message::Shutdown).await.is_err() {
            log::debug!("[Router] Shutdown requested after router stopped");
        }
    }
}

fn into_text(response: Response) -> Option<String> {
    match response {
        Response::Text { text, .. } => text,
        _ => None,
    }
}
