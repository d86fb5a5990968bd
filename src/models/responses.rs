use serde::{Deserialize, Serialize};
use crate::models::domain::BloodGroup;

/// Figures shown on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSummary {
    pub total_donors: i64,
    /// Number of requests posted so far; the demo counts each as a life saved
    pub lives_saved: i64,
    pub cities_served: i64,
}

/// Available and eligible donor counts for one blood group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodGroupAvailability {
    pub blood_group: BloodGroup,
    /// Donors of this group with the availability flag set
    pub total: usize,
    pub eligible: usize,
}

/// Figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_donors: usize,
    pub eligible_donors: usize,
    pub total_requests: i64,
    pub availability: Vec<BloodGroupAvailability>,
}
