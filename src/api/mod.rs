pub mod extract;
pub mod format;

pub use extract::{ApiQuery, IdPath};
pub use format::{views, DonationView, OrganizationView, Reference, RequirementView, UserView};
