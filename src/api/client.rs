//! API client for communicating with the Humanforce service.
//!
//! `HumanforceClient` owns the single authenticated session. It logs in
//! against the central server, optionally restores a persisted session
//! ("remember me"), stamps every tenant-scoped request with the session's
//! routing and credential headers, and exposes the calendar, payslip and
//! profile operations.

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::auth::{Session, SessionStore};
use crate::config::ClientConfig;
use crate::models::{CalendarEntry, Payslip, PayslipEntry, Profile, ProfileResponse, Shift};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// User agent of the Android app the upstream expects to talk to.
const USER_AGENT: &str = "Dalvik/2.1.0 (Linux; U; Android 12; Build/SE1A.220826.005)";

/// Login entry point on the central server (not company-specific).
const LOGIN_PATH: &str = "/v3/user/login/";

/// Cheap authenticated endpoint used to probe session liveness.
const SESSION_PROBE_PATH: &str = "/Common/UserSettings";

/// Device registration constants from the upstream's client-identification
/// scheme. Opaque configuration: the login endpoint rejects requests
/// without them.
const DEVICE_ID: &str = "489e1269adc779af";
const DEVICE_TOKEN: &str = "dSs4kEn4Tp6a1JOFNjeUl5:APA91bF_WBtrUXOx-EkLQMJv9j0HnBVyLUZjugeDBRjVOiCT5Y4yrAfBQGiDMcZ2c2yUojrQMkXDSuL4hYSCinev7sKoclr0TcLdjfeMOq8TmQOPEMz6_AF6zIjh9-y2g1tSAkCyjE1S";

/// Header carrying the tenant session token.
const HEADER_SESSION_TOKEN: &str = "sessiontoken";

/// Header carrying the timezone offset in minutes.
const HEADER_TIMEZONE_OFFSET: &str = "timezoneoffset";

/// Payslip listing page size, fixed by the upstream.
const PAYSLIP_PAGE_SIZE: usize = 20;

/// Upper bound on payslip pages fetched by one listing call.
const PAYSLIP_MAX_PAGES: usize = 50;

/// How far back the payslip listing reaches, in months.
const PAYSLIP_LOOKBACK_MONTHS: u32 = 120;

/// Default calendar window in months around the current month, matching the
/// mobile application's defaults.
const CALENDAR_LOOKBACK_MONTHS: u32 = 2;
const CALENDAR_LOOKAHEAD_MONTHS: u32 = 2;

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "deviceId")]
    device_id: &'a str,
    #[serde(rename = "deviceToken")]
    device_token: &'a str,
    #[serde(rename = "isDevelopment")]
    is_development: bool,
    #[serde(rename = "TimezoneOffset")]
    timezone_offset: i32,
}

#[derive(Debug, Serialize)]
struct CalendarRangeRequest {
    #[serde(rename = "DateFrom")]
    date_from: String,
    #[serde(rename = "DateTo")]
    date_to: String,
}

#[derive(Debug, Serialize)]
struct ProfileRequest {
    #[serde(rename = "TimezoneOffset")]
    timezone_offset: i32,
}

/// Routing and credential material for one tenant-scoped request, resolved
/// from the current session.
struct RequestContext {
    base_url: String,
    session_token: String,
}

impl RequestContext {
    fn for_session(session: &Session) -> Result<Self, ApiError> {
        let company = session.primary_company().ok_or(ApiError::NotAuthenticated)?;
        Ok(Self {
            base_url: company.endpoint_url.trim_end_matches('/').to_string(),
            session_token: company.session_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Humanforce API, holding at most one authenticated session.
pub struct HumanforceClient {
    client: Client,
    config: ClientConfig,
    /// The single session slot. `None` is the unauthenticated state. A held
    /// session is always well-formed and is replaced wholesale, never
    /// mutated in place.
    session: RwLock<Option<Session>>,
    /// Serializes login attempts so two concurrent logins cannot clobber
    /// each other's session.
    login_guard: Mutex<()>,
    /// Single-slot profile cache, dropped whenever the session changes.
    profile_cache: RwLock<Option<Profile>>,
}

impl HumanforceClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            session: RwLock::new(None),
            login_guard: Mutex::new(()),
            profile_cache: RwLock::new(None),
        })
    }

    /// Whether a session is currently held.
    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Display name of the company the session is scoped to.
    pub async fn company_name(&self) -> Result<String, ApiError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(ApiError::NotAuthenticated)?;
        let company = session.primary_company().ok_or(ApiError::NotAuthenticated)?;
        Ok(company.name.clone())
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Log in to Humanforce.
    ///
    /// With `remember` set, a previously persisted session is tried first;
    /// when it loads and passes the liveness probe, no credential login
    /// happens at all. Store or probe failures on that path are logged and
    /// fall through to a fresh login, after which the new session is
    /// persisted for next time.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<(), ApiError> {
        // One login at a time; late callers wait here and then run against
        // whatever session the winner installed.
        let _guard = self.login_guard.lock().await;

        if remember {
            match self.try_restore_session().await {
                Ok(true) => {
                    info!("restored persisted session");
                    return Ok(());
                }
                Ok(false) => debug!("persisted session no longer valid, logging in fresh"),
                Err(err) => debug!(error = %err, "could not restore persisted session"),
            }
        }

        let session = self.authenticate(email, password).await?;

        if remember {
            SessionStore::new(&self.config.session_file).save(&session)?;
        }

        self.install_session(Some(session)).await;
        info!("logged in");
        Ok(())
    }

    /// Drop the in-memory session and cached profile.
    ///
    /// The persisted session file, if any, is left in place; use
    /// [`SessionStore::clear`] to remove it.
    pub async fn logout(&self) {
        self.install_session(None).await;
    }

    /// Probe whether the held session is still accepted upstream.
    ///
    /// When the probe reports the session invalid, it is dropped and the
    /// client returns to the unauthenticated state; callers are expected to
    /// log in again.
    pub async fn test_session(&self) -> Result<bool, ApiError> {
        let session = {
            let guard = self.session.read().await;
            guard.clone().ok_or(ApiError::NotAuthenticated)?
        };

        let valid = self.probe_session(&session).await?;
        if !valid {
            warn!("session rejected by probe, dropping it");
            self.install_session(None).await;
        }
        Ok(valid)
    }

    /// Remember-me fast path: load the persisted session and probe it.
    /// Installs the session and reports true only when the probe confirms
    /// it; a rejected session is never reused.
    async fn try_restore_session(&self) -> Result<bool, ApiError> {
        let session = SessionStore::new(&self.config.session_file).load()?;
        if self.probe_session(&session).await? {
            self.install_session(Some(session)).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Replace the session slot wholesale. The cached profile belongs to the
    /// previous identity and is dropped with it.
    async fn install_session(&self, session: Option<Session>) {
        *self.profile_cache.write().await = None;
        *self.session.write().await = session;
    }

    /// Single credential login against the central server. No retry; retry
    /// policy is the caller's concern.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = format!(
            "{}{}",
            self.config.auth_base_url.trim_end_matches('/'),
            LOGIN_PATH
        );
        let body = LoginRequest {
            email,
            password,
            device_id: DEVICE_ID,
            device_token: DEVICE_TOKEN,
            is_development: false,
            timezone_offset: self.config.timezone_offset_minutes,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let session: Session = serde_json::from_str(&text)
            .map_err(|err| ApiError::Service(format!("malformed login response: {}", err)))?;
        if !session.is_well_formed() {
            return Err(ApiError::Service(
                "login response contains no usable company entry".to_string(),
            ));
        }
        Ok(session)
    }

    /// Issue the liveness probe for `session` and classify the status.
    ///
    /// A client-error status means the session is expired or unauthorized.
    /// Success and server errors both count as "still valid": a 5xx says
    /// nothing about our session. The status is inspected directly, never
    /// raised; only network-level failures propagate.
    async fn probe_session(&self, session: &Session) -> Result<bool, ApiError> {
        let context = RequestContext::for_session(session)?;
        let response = self
            .tenant_headers(self.client.get(context.url(SESSION_PROBE_PATH)), &context)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "session probe answered");
        Ok(probe_status_is_valid(status))
    }

    // ========================================================================
    // Request dispatch
    // ========================================================================

    /// Resolve the current session into request routing, failing before any
    /// network I/O when unauthenticated.
    async fn request_context(&self) -> Result<RequestContext, ApiError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(ApiError::NotAuthenticated)?;
        RequestContext::for_session(session)
    }

    fn tenant_headers(
        &self,
        request: reqwest::RequestBuilder,
        context: &RequestContext,
    ) -> reqwest::RequestBuilder {
        request
            .header(HEADER_SESSION_TOKEN, &context.session_token)
            .header(
                HEADER_TIMEZONE_OFFSET,
                self.config.timezone_offset_minutes.to_string(),
            )
    }

    async fn authed_get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        let context = self.request_context().await?;
        let mut request = self.client.get(context.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.tenant_headers(request, &context).send().await?;
        Self::check_response(response).await
    }

    async fn authed_post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let context = self.request_context().await?;
        let request = self.client.post(context.url(path)).json(body);
        let response = self.tenant_headers(request, &context).send().await?;
        Self::check_response(response).await
    }

    /// Check if a response is successful, mapping failures into the error
    /// taxonomy with a truncated body excerpt.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    // ========================================================================
    // Data operations
    // ========================================================================

    /// Fetch the shift calendar for a date range.
    ///
    /// Defaults match the mobile application: from the first day of the month
    /// two months back to the last day of the month two months ahead. Rows
    /// are filtered through [`ClientConfig::shift_status_filter`].
    pub async fn get_calendar(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Shift>, ApiError> {
        let today = Local::now().date_naive();
        let from = from.unwrap_or_else(|| calendar_window_start(today));
        let to = to.unwrap_or_else(|| calendar_window_end(today));

        let body = CalendarRangeRequest {
            date_from: format_calendar_date(from),
            date_to: format_calendar_date(to),
        };
        debug!(from = %body.date_from, to = %body.date_to, "fetching calendar");

        let response = self
            .authed_post("/Calendar/GetCalendarByDateRange", &body)
            .await?;
        let text = response.text().await?;
        let entries: Vec<CalendarEntry> = serde_json::from_str(&text)?;

        let filter = self.config.shift_status_filter;
        let shifts: Vec<Shift> = entries
            .into_iter()
            .filter(|entry| filter.map_or(true, |status| entry.status == status))
            .map(CalendarEntry::into_shift)
            .collect();

        debug!(count = shifts.len(), "calendar fetched");
        Ok(shifts)
    }

    /// Fetch every payslip from the last ten years, following the upstream's
    /// take/skip pagination until a short page or the page cap.
    pub async fn get_payslips(&self) -> Result<Vec<Payslip>, ApiError> {
        // Resolved once for the download links; each page request re-reads
        // the current session through the dispatcher.
        let context = self.request_context().await?;

        let now = Local::now().naive_local();
        let from = now
            .checked_sub_months(Months::new(PAYSLIP_LOOKBACK_MONTHS))
            .unwrap_or(now);

        // The upstream wants minute precision, no seconds or zone suffix.
        let start_date = from.format("%Y-%m-%dT%H:%M").to_string();
        let end_date = now.format("%Y-%m-%dT%H:%M").to_string();

        let mut payslips = Vec::new();
        for page in 0..PAYSLIP_MAX_PAGES {
            let skip = page * PAYSLIP_PAGE_SIZE;
            let response = self
                .authed_get(
                    "/Payslips",
                    &[
                        ("startDate", start_date.clone()),
                        ("endDate", end_date.clone()),
                        ("take", PAYSLIP_PAGE_SIZE.to_string()),
                        ("skip", skip.to_string()),
                    ],
                )
                .await?;

            let text = response.text().await?;
            let entries: Vec<PayslipEntry> = serde_json::from_str(&text)?;
            let page_len = entries.len();
            debug!(page, count = page_len, "payslip page fetched");

            payslips.extend(
                entries
                    .into_iter()
                    .map(|entry| entry.into_payslip(&context.base_url)),
            );

            if page_len < PAYSLIP_PAGE_SIZE {
                // Short page: nothing beyond this one.
                break;
            }
        }

        Ok(payslips)
    }

    /// Download the payslip document for `guid`, returning the raw bytes.
    pub async fn download_payslip(&self, guid: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authed_get(&format!("/Payslips/{}", guid), &[])
            .await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// The authenticated employee's profile, served from the single-slot
    /// cache after the first fetch.
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        if let Some(profile) = self.profile_cache.read().await.clone() {
            return Ok(profile);
        }
        self.refresh_profile().await
    }

    /// Fetch the profile from upstream, bypassing and replacing the cache.
    pub async fn refresh_profile(&self) -> Result<Profile, ApiError> {
        let body = ProfileRequest {
            timezone_offset: self.config.timezone_offset_minutes,
        };
        let response = self.authed_post("/account/GetProfile", &body).await?;
        let text = response.text().await?;
        let parsed: ProfileResponse = serde_json::from_str(&text)?;

        let profile = parsed.into_profile();
        *self.profile_cache.write().await = Some(profile.clone());
        Ok(profile)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Client errors mean the session was rejected; anything else, including
/// server errors, leaves the session presumed valid.
fn probe_status_is_valid(status: StatusCode) -> bool {
    !status.is_client_error()
}

/// First day of the month `CALENDAR_LOOKBACK_MONTHS` before today's month.
fn calendar_window_start(today: NaiveDate) -> NaiveDate {
    let anchor = today
        .checked_sub_months(Months::new(CALENDAR_LOOKBACK_MONTHS))
        .unwrap_or(today);
    anchor.with_day(1).unwrap_or(anchor)
}

/// Last day of the month `CALENDAR_LOOKAHEAD_MONTHS` after today's month:
/// first day of the month past the window, minus one day.
fn calendar_window_end(today: NaiveDate) -> NaiveDate {
    let past_window = today
        .checked_add_months(Months::new(CALENDAR_LOOKAHEAD_MONTHS + 1))
        .unwrap_or(today);
    let first = past_window.with_day(1).unwrap_or(past_window);
    first.checked_sub_days(Days::new(1)).unwrap_or(first)
}

fn format_calendar_date(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_probe_classification() {
        // Success and redirects leave the session valid.
        assert!(probe_status_is_valid(StatusCode::OK));
        assert!(probe_status_is_valid(StatusCode::NO_CONTENT));
        assert!(probe_status_is_valid(StatusCode::FOUND));
        // Server errors are presumed transient, not proof of invalidity.
        assert!(probe_status_is_valid(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(probe_status_is_valid(StatusCode::BAD_GATEWAY));
        // Client errors mean the session was rejected.
        assert!(!probe_status_is_valid(StatusCode::BAD_REQUEST));
        assert!(!probe_status_is_valid(StatusCode::UNAUTHORIZED));
        assert!(!probe_status_is_valid(StatusCode::FORBIDDEN));
        assert!(!probe_status_is_valid(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_calendar_window_defaults() {
        assert_eq!(calendar_window_start(date(2024, 5, 15)), date(2024, 3, 1));
        assert_eq!(calendar_window_end(date(2024, 5, 15)), date(2024, 7, 31));
    }

    #[test]
    fn test_calendar_window_across_year_boundaries() {
        assert_eq!(calendar_window_start(date(2024, 1, 10)), date(2023, 11, 1));
        assert_eq!(calendar_window_end(date(2024, 1, 10)), date(2024, 3, 31));

        assert_eq!(calendar_window_start(date(2023, 11, 30)), date(2023, 9, 1));
        // Window ends in January, reached through the short month of February.
        assert_eq!(calendar_window_end(date(2023, 11, 30)), date(2024, 1, 31));
    }

    #[test]
    fn test_calendar_date_format() {
        assert_eq!(format_calendar_date(date(2024, 3, 1)), "2024-03-01T00:00:00");
    }

    #[test]
    fn test_login_request_uses_upstream_field_names() {
        let body = LoginRequest {
            email: "jane@example.com",
            password: "hunter2",
            device_id: DEVICE_ID,
            device_token: DEVICE_TOKEN,
            is_development: false,
            timezone_offset: -600,
        };
        let value = serde_json::to_value(&body).unwrap();
        let object = value.as_object().unwrap();

        for key in [
            "email",
            "password",
            "deviceId",
            "deviceToken",
            "isDevelopment",
            "TimezoneOffset",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(value["isDevelopment"], serde_json::json!(false));
        assert_eq!(value["TimezoneOffset"], serde_json::json!(-600));
    }
}
