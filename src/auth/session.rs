use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::ApiError;

/// One company (tenant) association inside a session. Every tenant-scoped
/// request is routed to `endpoint_url` and authenticated with `session_token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySession {
    #[serde(rename = "endpointUrl")]
    pub endpoint_url: String,
    #[serde(rename = "sessionToken")]
    pub session_token: String,
    #[serde(default)]
    pub name: String,
}

/// Authenticated session, exactly as the login endpoint returns it and as it
/// is persisted to disk.
///
/// A session is either absent or well-formed. Both the authenticator and
/// `SessionStore::load` check [`Session::is_well_formed`] before handing a
/// session out, so holders never observe one without a usable company entry.
/// Sessions are replaced wholesale, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub companies: Vec<CompanySession>,
}

impl Session {
    /// The company all requests are routed through. Multi-company accounts
    /// exist upstream but the client always uses the first association.
    pub fn primary_company(&self) -> Option<&CompanySession> {
        self.companies.first()
    }

    /// At least one company with a non-empty endpoint and token.
    pub fn is_well_formed(&self) -> bool {
        self.primary_company()
            .map(|company| !company.endpoint_url.is_empty() && !company.session_token.is_empty())
            .unwrap_or(false)
    }
}

/// File persistence for sessions.
///
/// Purely a serialization boundary: the store never decides whether a loaded
/// session is still usable, that is the probe's job.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load a persisted session.
    ///
    /// Fails with `Io` when the file is missing or unreadable, and with
    /// `Deserialization` when its content is not a well-formed session.
    pub fn load(&self) -> Result<Session, ApiError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&contents)?;
        if !session.is_well_formed() {
            return Err(ApiError::Deserialization(format!(
                "session file {} has no usable company entry",
                self.path.display()
            )));
        }
        debug!(path = %self.path.display(), "loaded persisted session");
        Ok(session)
    }

    /// Persist a session, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<(), ApiError> {
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    /// Remove the persisted session, if any.
    pub fn clear(&self) -> Result<(), ApiError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
