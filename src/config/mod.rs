//! PasteQueue - Configuration module

pub mod settings;

pub use settings::{data_dir, EnabledFlag, Settings, DATA_DIR_ENV};
