use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One payslip listing entry.
///
/// The document itself is fetched separately via
/// `HumanforceClient::download_payslip` with this entry's guid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payslip {
    pub guid: String,
    /// Start of the pay period.
    pub start_date: NaiveDateTime,
    /// End of the pay period.
    pub end_date: NaiveDateTime,
    /// Fully-addressed download URL on the tenant endpoint.
    pub download_link: String,
}

// Raw listing row as returned by /Payslips.
#[derive(Debug, Clone, Deserialize)]
pub struct PayslipEntry {
    #[serde(rename = "PayslipGuidKey")]
    pub payslip_guid_key: String,
    #[serde(rename = "DTPStart")]
    pub dtp_start: NaiveDateTime,
    #[serde(rename = "DTPEnd")]
    pub dtp_end: NaiveDateTime,
}

impl PayslipEntry {
    /// Convert to the Payslip domain type, deriving the download URL from the
    /// session's tenant endpoint.
    pub fn into_payslip(self, endpoint_url: &str) -> Payslip {
        let download_link = format!(
            "{}/Payslips/{}",
            endpoint_url.trim_end_matches('/'),
            self.payslip_guid_key
        );
        Payslip {
            guid: self.payslip_guid_key,
            start_date: self.dtp_start,
            end_date: self.dtp_end,
            download_link,
        }
    }
}
