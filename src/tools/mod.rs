//! Nutriplan Tools module
//!
//! Tool implementations behind the MCP server.

pub mod plans;
pub mod status;
