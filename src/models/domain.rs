use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodGroup {
    /// All groups in the order shown on forms and the dashboard.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the eight blood groups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood group: {0:?}")]
pub struct UnknownBloodGroup(pub String);

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}

/// A registered blood donor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub date_of_birth: Option<NaiveDate>,
    pub city: String,
    pub region: Option<String>,
    /// Donor-declared willingness to be contacted, independent of eligibility
    pub available: bool,
    pub last_donation_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Validated donor registration, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonor {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub date_of_birth: Option<NaiveDate>,
    pub city: String,
    pub region: Option<String>,
    pub available: bool,
    pub last_donation_date: Option<NaiveDate>,
}

/// A posted need for blood on behalf of a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: Uuid,
    pub patient_name: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: String,
    pub blood_group_needed: BloodGroup,
    pub units_required: u32,
    pub hospital_name: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
}

/// Validated blood request, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBloodRequest {
    pub patient_name: String,
    pub contact_person: String,
    pub email: Option<String>,
    pub phone: String,
    pub blood_group_needed: BloodGroup,
    pub units_required: u32,
    pub hospital_name: String,
    pub city: String,
}

/// Criteria for the human-facing donor search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub blood_group: Option<BloodGroup>,
    /// Case-insensitive substring of the donor's city
    pub city: Option<String>,
}
