mod catalog_repo;
mod complaint_repo;
mod compliance_sync_repo;
mod role_repo;
mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use complaint_repo::{ComplaintRepo, WriteScope};
pub use compliance_sync_repo::ComplianceSyncRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
