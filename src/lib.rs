//! Nutriplan Library
//!
//! Daily nutrition target calculation and diet plan storage.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
