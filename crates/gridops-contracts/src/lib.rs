//! # gridops-contracts
//!
//! Shared wire types and contracts for the GridOps dashboard.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types mirroring the backend's
//! JSON contract.

pub mod api;
pub mod case;
pub mod error;
pub mod signal;
pub mod task;
