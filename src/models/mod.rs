// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BloodGroup, BloodRequest, Donor, NewBloodRequest, NewDonor, SearchCriteria, UnknownBloodGroup};
pub use requests::{BloodRequestForm, DonorForm, SearchQuery};
pub use responses::{BloodGroupAvailability, DashboardStats, HomeSummary};
