pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenancyRepository;
pub mod people_repo;
pub use people_repo::PeopleRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod membership_repo;
pub use membership_repo::MembershipRepository;
pub mod scheduling_repo;
pub use scheduling_repo::SchedulingRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
