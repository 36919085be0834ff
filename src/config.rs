//! Client configuration.
//!
//! Defaults match the observed behavior of the Humanforce mobile application;
//! the base URL and session path are overridable so tests can point the client
//! at a mock upstream.

use std::path::PathBuf;
use std::time::Duration;

/// Central Humanforce server. Only authentication goes here; everything else
/// is routed to the company endpoint returned by the login response.
const DEFAULT_AUTH_BASE_URL: &str = "https://api.humanforce.com";

/// Default session file name, relative to the working directory
const SESSION_FILE: &str = "session.json";

/// HTTP request timeout in seconds.
/// The mobile client uses 5s; tenant endpoints answer well within that.
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Shift status the mobile app treats as a real rostered shift. The upstream
/// does not document its status codes; 7 is the observed value for
/// confirmed shifts.
const ROSTERED_SHIFT_STATUS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the central login server.
    pub auth_base_url: String,
    /// Timezone offset in minutes, in the convention the upstream expects
    /// (UTC minus local, positive west of UTC).
    pub timezone_offset_minutes: i32,
    /// Where the session is persisted when logging in with remember set.
    pub session_file: PathBuf,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// Calendar rows are kept only when their status matches. `None` keeps
    /// every row the upstream returns.
    pub shift_status_filter: Option<i64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            timezone_offset_minutes: system_timezone_offset_minutes(),
            session_file: PathBuf::from(SESSION_FILE),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            shift_status_filter: Some(ROSTERED_SHIFT_STATUS),
        }
    }
}

/// Offset in minutes between UTC and local time, positive west of UTC.
/// This is the convention JavaScript's `getTimezoneOffset` uses, which is
/// what the upstream's `timezoneoffset` header and login field expect.
pub fn system_timezone_offset_minutes() -> i32 {
    let local_minus_utc = chrono::Local::now().offset().local_minus_utc();
    -(local_minus_utc / 60)
}
