//! PasteQueue - Command handlers
//!
//! Request and response types of the command router and the dispatcher that
//! applies them to the queue coordinator

use serde::{Deserialize, Serialize};

use crate::queue::QueueCoordinator;

/// Request accepted by the command router
///
/// Tagged by `action`. Both the kebab-case operation names and the names the
/// browser extension sends are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Command {
    /// Pending items, from the cursor onward
    #[serde(rename = "get-pending-queue", alias = "getQueue")]
    GetPendingQueue,
    /// Replace the whole queue and reset the cursor
    #[serde(rename = "replace-queue", alias = "setQueue")]
    ReplaceQueue { queue: Vec<String> },
    /// Consume the next item
    #[serde(rename = "paste", alias = "consume-next")]
    Paste,
    /// Rewind the cursor by one
    #[serde(rename = "undo", alias = "rewind-one")]
    Undo,
    /// Next item without consuming it
    #[serde(rename = "peek-next", alias = "getNextItem")]
    PeekNext,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetPendingQueue => "get-pending-queue",
            Command::ReplaceQueue { .. } => "replace-queue",
            Command::Paste => "paste",
            Command::Undo => "undo",
            Command::PeekNext => "peek-next",
        }
    }
}

/// Response to exactly one `Command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `get-pending-queue`
    Queue { queue: Vec<String> },
    /// `paste` and `peek-next`
    Text {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// `replace-queue` and `undo`
    Ack { success: bool },
    /// Request could not be understood
    Failed { success: bool, error: String },
}

impl Response {
    pub fn text(text: Option<String>) -> Self {
        Response::Text {
            success: text.is_some(),
            text,
        }
    }

    pub fn ack(success: bool) -> Self {
        Response::Ack { success }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Response::Failed {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Response::Queue { .. } => true,
            Response::Text { success, .. }
            | Response::Ack { success }
            | Response::Failed { success, .. } => *success,
        }
    }
}

/// Apply one command to the coordinator
pub fn dispatch(coordinator: &mut QueueCoordinator, command: Command) -> Response {
    match command {
        Command::GetPendingQueue => Response::Queue {
            queue: coordinator.peek_pending(),
        },
        Command::ReplaceQueue { queue } => Response::ack(coordinator.replace_queue(queue)),
        Command::Paste => Response::text(coordinator.consume_next()),
        Command::Undo => Response::ack(coordinator.rewind_one()),
        Command::PeekNext => Response::text(coordinator.peek_next()),
    }
}
