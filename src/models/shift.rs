use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry from the shift calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub guid: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Worksite, e.g. "ADELAIDE TABLET".
    pub location: Option<String>,
    /// E.g. "PM SHIFT".
    pub department: Option<String>,
    /// E.g. "AIR SERVICES DRIVER MR OR HR".
    pub role: Option<String>,
    /// Normally "Normal". Public holidays carry the holiday name in caps,
    /// e.g. "EASTER SATURDAY".
    pub shift_type: String,
    /// Upstream status code. Meaning undocumented; 7 is the observed value
    /// for confirmed rostered shifts.
    pub status: i64,
}

// Raw calendar row as returned by /Calendar/GetCalendarByDateRange.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEntry {
    #[serde(rename = "GuidKey")]
    pub guid_key: String,
    #[serde(rename = "ShiftType", default)]
    pub shift_type: String,
    #[serde(rename = "Status", default)]
    pub status: i64,
    #[serde(rename = "DateTimeStart")]
    pub date_time_start: NaiveDateTime,
    #[serde(rename = "DateTimeEnd")]
    pub date_time_end: NaiveDateTime,
    #[serde(rename = "LDR")]
    pub ldr: Option<LdrEntry>,
}

/// Location/department/role block. Present on rostered shifts, absent on
/// calendar rows that are not real shifts.
#[derive(Debug, Clone, Deserialize)]
pub struct LdrEntry {
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    #[serde(rename = "Role")]
    pub role: Option<String>,
}

impl CalendarEntry {
    /// Convert to the Shift domain type.
    pub fn into_shift(self) -> Shift {
        let (location, department, role) = match self.ldr {
            Some(ldr) => (ldr.location, ldr.department, ldr.role),
            None => (None, None, None),
        };
        Shift {
            guid: self.guid_key,
            start_time: self.date_time_start,
            end_time: self.date_time_end,
            location,
            department,
            role,
            shift_type: self.shift_type,
            status: self.status,
        }
    }
}
