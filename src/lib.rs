//! Client library for the Humanforce workforce management service.
//!
//! The library authenticates against the central Humanforce server, holds the
//! resulting company-scoped session (optionally persisting it across runs),
//! and exposes typed operations for shift calendars, payslips and the
//! employee profile.
//!
//! ```no_run
//! use humanforce::{Credentials, HumanforceClient};
//!
//! # async fn run() -> Result<(), humanforce::ApiError> {
//! let credentials = Credentials::load("credentials.json")?;
//! let client = HumanforceClient::new()?;
//! client.login(&credentials.email, &credentials.password, true).await?;
//!
//! let profile = client.get_profile().await?;
//! println!("logged in as {}", profile.full_name());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, HumanforceClient};
pub use auth::{CompanySession, Credentials, Session, SessionStore};
pub use config::ClientConfig;
pub use models::{Payslip, Profile, Shift};
