pub mod auth;
pub mod catalog_service;
pub mod finance_service;
pub mod membership_service;
pub mod people_service;
pub mod scheduling_service;
pub mod tenancy_service;
