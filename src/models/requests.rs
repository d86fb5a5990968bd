use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::RegistryError;
use crate::models::domain::{BloodGroup, NewBloodRequest, NewDonor, SearchCriteria};

/// Date format used by the HTML date inputs
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Donor registration form, as posted by the browser
///
/// Every field defaults to empty so that a missing field is reported as a
/// validation message instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DonorForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub blood_group: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Checkbox; browsers send `on` when ticked and omit the field otherwise
    #[serde(default)]
    pub available: Option<String>,
    #[serde(default)]
    pub last_donation_date: String,
}

impl DonorForm {
    /// Validate the form and convert it into a donor ready to be stored.
    ///
    /// `today` bounds the last donation date, which may not lie in the future.
    pub fn into_new_donor(self, today: NaiveDate) -> Result<NewDonor, RegistryError> {
        self.validate()?;

        let blood_group = parse_blood_group(&self.blood_group)?;
        let date_of_birth = parse_optional_date("date_of_birth", &self.date_of_birth)?;
        let last_donation_date =
            parse_optional_date("last_donation_date", &self.last_donation_date)?;

        if let Some(date) = last_donation_date {
            if date > today {
                return Err(RegistryError::validation(
                    "last_donation_date cannot be in the future",
                ));
            }
        }

        Ok(NewDonor {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            blood_group,
            date_of_birth,
            city: self.city,
            region: non_empty(&self.state),
            available: self.available.as_deref() == Some("on"),
            last_donation_date,
        })
    }
}

/// Blood request form, as posted by the browser
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BloodRequestForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub patient_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub blood_group_needed: String,
    #[serde(default = "default_units")]
    pub units_required: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub hospital_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub city: String,
}

fn default_units() -> String {
    "1".to_string()
}

impl BloodRequestForm {
    pub fn into_new_request(self) -> Result<NewBloodRequest, RegistryError> {
        self.validate()?;

        let blood_group_needed = parse_blood_group(&self.blood_group_needed)?;
        let units_required = match self.units_required.trim().parse::<u32>() {
            Ok(units) if units > 0 => units,
            _ => {
                return Err(RegistryError::validation(
                    "units_required must be a positive whole number",
                ))
            }
        };

        Ok(NewBloodRequest {
            patient_name: self.patient_name,
            contact_person: self.contact_person,
            email: non_empty(&self.email),
            phone: self.phone,
            blood_group_needed,
            units_required,
            hospital_name: self.hospital_name,
            city: self.city,
        })
    }
}

/// Query string of the donor search page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub city: String,
}

impl SearchQuery {
    /// Empty fields mean "any". An unknown blood group is rejected.
    pub fn criteria(&self) -> Result<SearchCriteria, RegistryError> {
        let blood_group = if self.blood_group.is_empty() {
            None
        } else {
            Some(parse_blood_group(&self.blood_group)?)
        };

        Ok(SearchCriteria {
            blood_group,
            city: non_empty(&self.city),
        })
    }
}

fn parse_blood_group(raw: &str) -> Result<BloodGroup, RegistryError> {
    raw.parse::<BloodGroup>()
        .map_err(|e| RegistryError::validation(e.to_string()))
}

fn parse_optional_date(field: &str, raw: &str) -> Result<Option<NaiveDate>, RegistryError> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT)
        .map(Some)
        .map_err(|e| {
            RegistryError::validation(format!(
                "{} {:?} is not a valid YYYY-MM-DD date ({})",
                field, raw, e
            ))
        })
}

/// Text fields are kept exactly as submitted; only emptiness is checked
fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn donor_form() -> DonorForm {
        DonorForm {
            full_name: "Rahul Mehta".to_string(),
            email: "rahul@example.com".to_string(),
            phone: "9000000002".to_string(),
            blood_group: "O-".to_string(),
            date_of_birth: "1992-03-14".to_string(),
            city: "Mumbai".to_string(),
            state: "MH".to_string(),
            available: Some("on".to_string()),
            last_donation_date: String::new(),
        }
    }

    fn request_form() -> BloodRequestForm {
        BloodRequestForm {
            patient_name: "Imran Khan".to_string(),
            contact_person: "Nadia".to_string(),
            email: String::new(),
            phone: "9111111111".to_string(),
            blood_group_needed: "O-".to_string(),
            units_required: "2".to_string(),
            hospital_name: "City Hospital".to_string(),
            city: "Lahore".to_string(),
        }
    }

    #[test]
    fn test_donor_form_converts() {
        let donor = donor_form().into_new_donor(today()).unwrap();

        assert_eq!(donor.blood_group, BloodGroup::ONegative);
        assert_eq!(donor.date_of_birth, NaiveDate::from_ymd_opt(1992, 3, 14));
        assert_eq!(donor.region.as_deref(), Some("MH"));
        assert!(donor.available);
        assert_eq!(donor.last_donation_date, None);
    }

    #[test]
    fn test_city_kept_as_submitted() {
        let mut form = donor_form();
        form.city = " Mumbai ".to_string();
        assert_eq!(form.into_new_donor(today()).unwrap().city, " Mumbai ");

        let mut form = request_form();
        form.city = "Lahore ".to_string();
        assert_eq!(form.into_new_request().unwrap().city, "Lahore ");
    }

    #[test]
    fn test_unchecked_availability_is_false() {
        let mut form = donor_form();
        form.available = None;
        assert!(!form.into_new_donor(today()).unwrap().available);

        let mut form = donor_form();
        form.available = Some("yes".to_string());
        assert!(!form.into_new_donor(today()).unwrap().available);
    }

    #[test]
    fn test_bad_date_of_birth_is_validation_error() {
        let mut form = donor_form();
        form.date_of_birth = "14/03/1992".to_string();

        match form.into_new_donor(today()) {
            Err(RegistryError::Validation(msg)) => assert!(msg.contains("date_of_birth")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_future_last_donation_rejected() {
        let mut form = donor_form();
        form.last_donation_date = "2024-06-02".to_string();
        assert!(matches!(
            form.into_new_donor(today()),
            Err(RegistryError::Validation(_))
        ));

        let mut form = donor_form();
        form.last_donation_date = "2024-06-01".to_string();
        assert!(form.into_new_donor(today()).is_ok());
    }

    #[test]
    fn test_missing_required_fields_listed() {
        let mut form = donor_form();
        form.full_name.clear();
        form.city.clear();

        match form.into_new_donor(today()) {
            Err(RegistryError::Validation(msg)) => {
                assert!(msg.contains("full_name"));
                assert!(msg.contains("city"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_blood_group_rejected() {
        let mut form = donor_form();
        form.blood_group = "C+".to_string();
        assert!(form.into_new_donor(today()).is_err());
    }

    #[test]
    fn test_request_form_converts() {
        let request = request_form().into_new_request().unwrap();

        assert_eq!(request.units_required, 2);
        assert_eq!(request.email, None);
        assert_eq!(request.blood_group_needed, BloodGroup::ONegative);
    }

    #[test]
    fn test_request_units_must_be_positive() {
        for units in ["0", "-1", "two", ""] {
            let mut form = request_form();
            form.units_required = units.to_string();
            assert!(form.into_new_request().is_err(), "units {:?} accepted", units);
        }
    }

    #[test]
    fn test_search_query_criteria() {
        let query = SearchQuery {
            blood_group: String::new(),
            city: "mum".to_string(),
        };
        let criteria = query.criteria().unwrap();
        assert_eq!(criteria.blood_group, None);
        assert_eq!(criteria.city.as_deref(), Some("mum"));

        let query = SearchQuery {
            blood_group: "AB+".to_string(),
            city: String::new(),
        };
        let criteria = query.criteria().unwrap();
        assert_eq!(criteria.blood_group, Some(BloodGroup::AbPositive));
        assert_eq!(criteria.city, None);
    }
}
