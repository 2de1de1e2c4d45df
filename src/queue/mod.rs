//! PasteQueue - Queue module
//!
//! The live paste queue, its read cursor and the views shown in the control panel

pub mod coordinator;
pub mod models;

pub use coordinator::QueueCoordinator;
pub use models::QueueEntryView;
