pub mod donation;
pub mod lookup;
pub mod organization;
pub mod requirement;
pub mod user;

pub use donation::Donation;
pub use lookup::{Lookup, LookupKind};
pub use organization::{NewOrganization, Organization, OrganizationChanges};
pub use requirement::{NewRequirement, Requirement, RequirementChanges};
pub use user::{NewUser, User};
