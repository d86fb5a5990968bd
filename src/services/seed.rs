use chrono::{Duration, NaiveDate};

use crate::models::{BloodGroup, NewBloodRequest, NewDonor};
use crate::services::store::{RegistryStore, StoreError};

/// Insert the demonstration donors and requests unless donors already exist
///
/// Donation dates are relative to `today`. Returns whether rows were added.
pub async fn seed_if_empty(store: &RegistryStore, today: NaiveDate) -> Result<bool, StoreError> {
    if store.count_donors().await? > 0 {
        tracing::debug!("Donor table not empty, skipping demo data");
        return Ok(false);
    }

    let donors = demo_donors(today);
    let requests = demo_requests();
    store.insert_batch(&donors, &requests).await?;

    tracing::info!(
        "Seeded {} demo donors and {} demo requests",
        donors.len(),
        requests.len()
    );

    Ok(true)
}

fn demo_donor(
    name: &str,
    email: &str,
    phone: &str,
    blood_group: BloodGroup,
    born: (i32, u32, u32),
    city: &str,
    region: &str,
    available: bool,
    last_donation_date: Option<NaiveDate>,
) -> NewDonor {
    NewDonor {
        full_name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        blood_group,
        date_of_birth: NaiveDate::from_ymd_opt(born.0, born.1, born.2),
        city: city.to_string(),
        region: Some(region.to_string()),
        available,
        last_donation_date,
    }
}

pub fn demo_donors(today: NaiveDate) -> Vec<NewDonor> {
    vec![
        demo_donor(
            "Aisha Khan",
            "aisha@example.com",
            "9000000001",
            BloodGroup::APositive,
            (1995, 5, 1),
            "Lahore",
            "Punjab",
            true,
            Some(today - Duration::days(120)),
        ),
        demo_donor(
            "Rahul Mehta",
            "rahul@example.com",
            "9000000002",
            BloodGroup::ONegative,
            (1992, 3, 14),
            "Mumbai",
            "MH",
            true,
            Some(today - Duration::days(45)),
        ),
        demo_donor(
            "Sara Ali",
            "sara@example.com",
            "9000000003",
            BloodGroup::BPositive,
            (1998, 9, 21),
            "Karachi",
            "Sindh",
            false,
            None,
        ),
        demo_donor(
            "John Doe",
            "john@example.com",
            "9000000004",
            BloodGroup::AbPositive,
            (1989, 1, 10),
            "Delhi",
            "DL",
            true,
            None,
        ),
    ]
}

pub fn demo_requests() -> Vec<NewBloodRequest> {
    vec![
        NewBloodRequest {
            patient_name: "Imran Khan".to_string(),
            contact_person: "Nadia".to_string(),
            email: Some("nadia@example.com".to_string()),
            phone: "9111111111".to_string(),
            blood_group_needed: BloodGroup::ONegative,
            units_required: 2,
            hospital_name: "City Hospital".to_string(),
            city: "Lahore".to_string(),
        },
        NewBloodRequest {
            patient_name: "Priya Sharma".to_string(),
            contact_person: "Vikram".to_string(),
            email: Some("vikram@example.com".to_string()),
            phone: "9222222222".to_string(),
            blood_group_needed: BloodGroup::APositive,
            units_required: 1,
            hospital_name: "General Care".to_string(),
            city: "Mumbai".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_runs_once() {
        let store = RegistryStore::in_memory().await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(seed_if_empty(&store, today).await.unwrap());
        assert!(!seed_if_empty(&store, today).await.unwrap());

        assert_eq!(store.count_donors().await.unwrap(), 4);
        assert_eq!(store.count_requests().await.unwrap(), 2);
    }

    #[test]
    fn test_demo_dates_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let donors = demo_donors(today);

        assert_eq!(donors[0].last_donation_date, Some(today - Duration::days(120)));
        assert_eq!(donors[1].last_donation_date, Some(today - Duration::days(45)));
        assert!(!donors[2].available);
    }
}
