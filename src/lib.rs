//! RedConnect - blood donor registry with request matching
//!
//! Donors register, requesters post blood needs, and each new request is
//! matched once against available, eligible donors in the same city with the
//! same blood group.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

// Re-export commonly used types
pub use crate::core::{is_eligible, Matcher, MatchResult};
pub use error::RegistryError;
pub use models::{BloodGroup, BloodRequest, Donor, NewBloodRequest, NewDonor, SearchCriteria};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_library_exports() {
        let donor = Donor {
            id: uuid::Uuid::new_v4(),
            full_name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "9000000004".to_string(),
            blood_group: BloodGroup::AbPositive,
            date_of_birth: None,
            city: "Delhi".to_string(),
            region: None,
            available: true,
            last_donation_date: None,
            created_at: Utc::now(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(is_eligible(&donor, today));
    }
}
