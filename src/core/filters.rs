use crate::models::{BloodRequest, Donor, SearchCriteria};

/// Check if a donor satisfies the hard constraints of a blood request
///
/// Blood group and city must be equal to the requested ones. City
/// comparison is exact and case-sensitive.
#[inline]
pub fn matches_request(donor: &Donor, request: &BloodRequest) -> bool {
    if !donor.available {
        return false;
    }

    donor.blood_group == request.blood_group_needed && donor.city == request.city
}

/// Check if a donor satisfies the donor search criteria
///
/// Unlike [`matches_request`], the city is matched as a case-insensitive
/// substring, so "mum" finds donors in "Mumbai".
#[inline]
pub fn matches_search(donor: &Donor, criteria: &SearchCriteria) -> bool {
    if !donor.available {
        return false;
    }

    if let Some(group) = criteria.blood_group {
        if donor.blood_group != group {
            return false;
        }
    }

    match criteria.city.as_deref() {
        Some(city) if !city.is_empty() => city_contains(&donor.city, city),
        _ => true,
    }
}

/// Case-insensitive substring test
#[inline]
pub fn city_contains(city: &str, needle: &str) -> bool {
    city.to_lowercase().contains(&needle.to_lowercase())
}
