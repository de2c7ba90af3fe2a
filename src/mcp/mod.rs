//! Model Context Protocol (MCP) JSON-RPC handling
//!
//! Provides the envelope codec and the method dispatcher.

pub mod rpc;
pub mod server;
