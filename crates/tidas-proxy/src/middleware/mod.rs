//! # HTTP Middleware
//!
//! Cross-cutting request middleware: in-process metrics counters and the
//! `tower-http` tracing layer. Authentication lives in [`crate::auth`].

pub mod metrics;
pub mod tracing_layer;
