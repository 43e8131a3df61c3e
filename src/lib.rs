//! Routing and scheduling engine for commercial insurance submissions.
//!
//! The library exposes the submission workflow (risk profiling, underwriter
//! routing, lifecycle tracking, contact scheduling) behind a service facade;
//! the binary wraps it in an HTTP server and CLI.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
