//! # taskboard-client
//!
//! Consumer side of the taskboard HTTP API.
//!
//! - [`api`]: [`ApiClient`], one typed call per endpoint
//! - [`board`]: [`TaskBoard`], view state that resyncs from the server after
//!   every mutation

#![deny(unsafe_code)]

pub mod api;
pub mod board;

pub use api::{ApiClient, ClientError, DEFAULT_API_URL, Health};
pub use board::{Draft, EditState, TaskBoard};
