//! Typed records mapped from upstream responses.
//!
//! This module contains the data structures the client hands back:
//!
//! - `Shift`: one calendar entry with roster metadata
//! - `Payslip`: one pay-period listing entry with its download reference
//! - `Profile`: the authenticated employee
//!
//! The raw row types (`CalendarEntry`, `PayslipEntry`, `ProfileResponse`)
//! keep the upstream's PascalCase field names and convert into the domain
//! types; absent optional fields stay unset.

pub mod payslip;
pub mod profile;
pub mod shift;

pub use payslip::{Payslip, PayslipEntry};
pub use profile::{Profile, ProfileResponse};
pub use shift::{CalendarEntry, LdrEntry, Shift};
