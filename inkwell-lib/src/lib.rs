//! Inkwell client library
//!
//! Session handling, token refresh and a JSON API client for the blog API,
//! plus an in-process simulated backend for running without a server.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod storage;

pub use config::Config;
pub use error::Error;
