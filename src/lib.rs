//! Cafe API tester
//!
//! This library drives sequential end-to-end checks against the cafe
//! ordering REST API: catalog, admin authentication, order lifecycle and
//! dashboard statistics.

pub mod api;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
