//! Core domain types for taskwatch.
//!
//! This crate contains pure domain types with no IO and no async: the task
//! identifier and status vocabulary of the cluster control plane, and the
//! wire shapes of its admin request/response envelope. Everything here can
//! be used from any layer, including test fakes that never touch a network.

mod admin;
mod ids;
mod status;

pub use admin::{AdminApiError, AdminRequest, AdminResponse};
pub use ids::TaskId;
pub use status::TaskStatus;
