use chrono::{Duration, NaiveDate};

use crate::core::{
    eligibility::{donation_interval, is_eligible_within},
    filters::{matches_request, matches_search},
};
use crate::models::{BloodGroup, BloodGroupAvailability, BloodRequest, Donor, SearchCriteria};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Donor>,
    pub total_candidates: usize,
}

/// Matching orchestrator - runs candidates through the filter pipeline
///
/// # Pipeline Stages
/// 1. Request (or search) constraints
/// 2. Eligibility
///
/// Candidates keep the order they were handed in, which is storage order.
#[derive(Debug, Clone)]
pub struct Matcher {
    interval: Duration,
}

impl Matcher {
    pub fn with_default_interval() -> Self {
        Self {
            interval: donation_interval(),
        }
    }

    pub fn is_eligible(&self, donor: &Donor, today: NaiveDate) -> bool {
        is_eligible_within(donor, today, self.interval)
    }

    /// Find the donors who should be notified about a blood request
    ///
    /// # Arguments
    /// * `request` - The posted blood request
    /// * `candidates` - Donors pre-selected by the store
    /// * `today` - Date eligibility is computed for
    pub fn find_matches(
        &self,
        request: &BloodRequest,
        candidates: Vec<Donor>,
        today: NaiveDate,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let matches = candidates
            .into_iter()
            .filter(|donor| matches_request(donor, request))
            .filter(|donor| self.is_eligible(donor, today))
            .collect();

        MatchResult {
            matches,
            total_candidates,
        }
    }

    /// Filter donors for the search page
    pub fn search(
        &self,
        criteria: &SearchCriteria,
        candidates: Vec<Donor>,
        today: NaiveDate,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let matches = candidates
            .into_iter()
            .filter(|donor| matches_search(donor, criteria))
            .filter(|donor| self.is_eligible(donor, today))
            .collect();

        MatchResult {
            matches,
            total_candidates,
        }
    }

    /// Count eligible donors among `donors`
    pub fn count_eligible(&self, donors: &[Donor], today: NaiveDate) -> usize {
        donors.iter().filter(|d| self.is_eligible(d, today)).count()
    }

    /// Per blood group: how many donors are available and how many of those
    /// are eligible today. Every group is listed, in [`BloodGroup::ALL`] order.
    pub fn availability(&self, donors: &[Donor], today: NaiveDate) -> Vec<BloodGroupAvailability> {
        BloodGroup::ALL
            .into_iter()
            .map(|group| {
                let available: Vec<&Donor> = donors
                    .iter()
                    .filter(|d| d.blood_group == group && d.available)
                    .collect();
                let eligible = available
                    .iter()
                    .filter(|d| self.is_eligible(d, today))
                    .count();

                BloodGroupAvailability {
                    blood_group: group,
                    total: available.len(),
                    eligible,
                }
            })
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn create_candidate(
        name: &str,
        group: BloodGroup,
        city: &str,
        available: bool,
        days_since_donation: Option<i64>,
    ) -> Donor {
        Donor {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "9000000000".to_string(),
            blood_group: group,
            date_of_birth: None,
            city: city.to_string(),
            region: None,
            available,
            last_donation_date: days_since_donation.map(|d| today() - Duration::days(d)),
            created_at: Utc::now(),
        }
    }

    fn create_request(group: BloodGroup, city: &str) -> BloodRequest {
        BloodRequest {
            id: Uuid::new_v4(),
            patient_name: "Imran Khan".to_string(),
            contact_person: "Nadia".to_string(),
            email: Some("nadia@example.com".to_string()),
            phone: "9111111111".to_string(),
            blood_group_needed: group,
            units_required: 2,
            hospital_name: "City Hospital".to_string(),
            city: city.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_interval();
        let request = create_request(BloodGroup::ONegative, "Lahore");

        let candidates = vec![
            create_candidate("Aisha", BloodGroup::ONegative, "Lahore", true, None),
            create_candidate("Bilal", BloodGroup::ONegative, "Lahore", true, Some(30)),
            create_candidate("Chand", BloodGroup::OPositive, "Lahore", true, None),
            create_candidate("Dina", BloodGroup::ONegative, "Karachi", true, None),
            create_candidate("Ehsan", BloodGroup::ONegative, "Lahore", false, None),
        ];

        let result = matcher.find_matches(&request, candidates, today());

        assert_eq!(result.total_candidates, 5);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].full_name, "Aisha");
    }

    #[test]
    fn test_matches_keep_candidate_order() {
        let matcher = Matcher::default();
        let request = create_request(BloodGroup::APositive, "Delhi");

        let candidates = vec![
            create_candidate("Zara", BloodGroup::APositive, "Delhi", true, None),
            create_candidate("Amir", BloodGroup::APositive, "Delhi", true, Some(200)),
            create_candidate("Mona", BloodGroup::APositive, "Delhi", true, Some(90)),
        ];

        let result = matcher.find_matches(&request, candidates, today());
        let names: Vec<&str> = result.matches.iter().map(|d| d.full_name.as_str()).collect();

        assert_eq!(names, vec!["Zara", "Amir", "Mona"]);
    }

    #[test]
    fn test_search_uses_substring_city() {
        let matcher = Matcher::default();
        let criteria = SearchCriteria {
            blood_group: None,
            city: Some("mum".to_string()),
        };

        let candidates = vec![
            create_candidate("Rahul", BloodGroup::ONegative, "Mumbai", true, Some(120)),
            create_candidate("Sara", BloodGroup::BPositive, "Navi Mumbai", true, None),
            create_candidate("John", BloodGroup::AbPositive, "Delhi", true, None),
        ];

        let result = matcher.search(&criteria, candidates, today());

        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn test_availability_lists_every_group() {
        let matcher = Matcher::default();
        let donors = vec![
            create_candidate("A", BloodGroup::APositive, "Lahore", true, Some(120)),
            create_candidate("B", BloodGroup::APositive, "Lahore", true, Some(10)),
            create_candidate("C", BloodGroup::APositive, "Lahore", false, None),
            create_candidate("D", BloodGroup::ONegative, "Mumbai", true, None),
        ];

        let availability = matcher.availability(&donors, today());

        assert_eq!(availability.len(), 8);
        assert_eq!(availability[0].blood_group, BloodGroup::APositive);
        assert_eq!(availability[0].total, 2);
        assert_eq!(availability[0].eligible, 1);

        let o_negative = availability
            .iter()
            .find(|a| a.blood_group == BloodGroup::ONegative)
            .unwrap();
        assert_eq!(o_negative.total, 1);
        assert_eq!(o_negative.eligible, 1);

        let b_negative = availability
            .iter()
            .find(|a| a.blood_group == BloodGroup::BNegative)
            .unwrap();
        assert_eq!(b_negative.total, 0);
        assert_eq!(b_negative.eligible, 0);
    }

    #[test]
    fn test_count_eligible() {
        let matcher = Matcher::default();
        let donors = vec![
            create_candidate("A", BloodGroup::APositive, "Lahore", true, None),
            create_candidate("B", BloodGroup::BPositive, "Lahore", false, None),
            create_candidate("C", BloodGroup::OPositive, "Lahore", true, Some(89)),
        ];

        assert_eq!(matcher.count_eligible(&donors, today()), 1);
    }
}
