//! Entity repositories.

pub mod company;

pub use company::{COMPANY_COLUMNS, Company, CompanyFilter, CompanyPatch, NewCompany};
