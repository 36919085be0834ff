//! Session state and credential input.
//!
//! This module provides:
//! - `Session` / `CompanySession`: the authenticated state returned by login
//! - `SessionStore`: JSON file persistence of a session ("remember me")
//! - `Credentials`: email/password input read from a JSON document
//!
//! A session is company-scoped: it carries the tenant endpoint all further
//! requests are routed to, plus the token that authenticates them.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{CompanySession, Session, SessionStore};
