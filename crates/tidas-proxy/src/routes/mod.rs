//! # API Route Modules
//!
//! Route modules for the proxy's API surface:
//!
//! - `identity` — The three Tidas passthrough endpoints: upstream ping,
//!   enrollment, and validation. Request bodies are parsed and validated
//!   locally; identity payloads are forwarded to the provider verbatim.

pub mod identity;
