//! Common utilities and types shared across minigfs

pub mod config;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use utils::{format_bytes, timestamp_now_millis};
