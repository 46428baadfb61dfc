//! # taskboard-core
//!
//! Shared building blocks for the taskboard workspace:
//!
//! - [`task`]: the `Task` entity, request payloads, and title validation
//! - [`logging`]: `tracing` subscriber initialization

#![deny(unsafe_code)]

pub mod logging;
pub mod task;

pub use task::{Task, TaskFields, TaskId, TaskInput, UpdatedTask, ValidationError};
