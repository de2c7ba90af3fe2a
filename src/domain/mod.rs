//! Tool contract, registry and the bundled Unity project tools
//!
//! Provides the file-generating and file-patching logic exposed over the MCP protocol.

pub mod anchor;
pub mod registry;
pub mod templates;
pub mod tools;
pub mod utils;
