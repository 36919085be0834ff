use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The authenticated employee's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub guid: String,
    /// Employee number/code.
    pub employee_code: String,
    /// May include other given names.
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Profile {
    /// First and last name concatenated; just the first name when no last
    /// name is on record.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    /// Hex-encoded SHA-256 over the profile's fields, for change detection.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        // NUL separators keep adjacent fields from colliding.
        for field in [&self.guid, &self.employee_code, &self.first_name] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
        if let Some(last) = &self.last_name {
            hasher.update(last.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

// Raw response body of /account/GetProfile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "GuidKey")]
    pub guid_key: String,
    #[serde(rename = "EmployeeCode")]
    pub employee_code: String,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
}

impl ProfileResponse {
    pub fn into_profile(self) -> Profile {
        Profile {
            guid: self.guid_key,
            employee_code: self.employee_code,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}
