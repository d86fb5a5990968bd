// Core algorithm exports
pub mod eligibility;
pub mod filters;
pub mod matcher;

pub use eligibility::{is_eligible, is_eligible_within, DONATION_INTERVAL_DAYS};
pub use filters::{matches_request, matches_search};
pub use matcher::{Matcher, MatchResult};
