//! Stdio transport for the Model Context Protocol
//!
//! Newline-delimited JSON-RPC over standard input/output.

pub mod stdio;

pub use stdio::{serve, serve_stdio, TransportError};
