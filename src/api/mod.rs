//! Client side of the cafe REST API
//!
//! The backend itself lives elsewhere; this module only knows its HTTP
//! contract: paths, payload shapes and the bearer-token header.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiResponse};
