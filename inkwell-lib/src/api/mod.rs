//! HTTP API client, transports and endpoints.

mod client;
pub mod endpoints;
mod simulated;
mod transport;

pub use client::{ApiClient, ApiResponse, DEFAULT_ERROR_MESSAGE, error_message};
pub use simulated::{DEMO_EMAIL, DEMO_PASSWORD, SimulatedBackend};
pub use transport::{ApiRequest, Method, RawResponse, ReqwestTransport, Transport};
