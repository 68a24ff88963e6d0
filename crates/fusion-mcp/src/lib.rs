//! fusion-mcp library
//!
//! This module exports the core functionality of fusion-mcp for use in
//! integration tests and as a library.

pub mod config;
pub mod format;
pub mod handlers;
pub mod health;
pub mod server;
