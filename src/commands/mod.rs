//! PasteQueue - Commands module
//!
//! Request/response contract between callers and the queue coordinator

pub mod handlers;
pub mod router;

pub use handlers::{dispatch, Command, Response};
pub use router::{CommandRouter, RouterError, RouterHandle};
