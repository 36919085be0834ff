//! HTTP client module for the Humanforce API.
//!
//! The client talks to two surfaces: the central server for credential login,
//! and the company endpoint returned at login for everything else. Tenant
//! requests are authenticated with a session token header rather than a
//! bearer token.

pub mod client;
pub mod error;

pub use client::HumanforceClient;
pub use error::ApiError;
