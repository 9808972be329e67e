//! Background Tasks Module
//!
//! # Tasks
//! - Cache sweep: drops stale cached responses at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
