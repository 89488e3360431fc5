//! Entity wrappers over the statement builders.
//!
//! Each entity declares its [`Table`](crate::qb::Table) metadata as a
//! constant and exposes async operations that accept any
//! [`GenericClient`](crate::GenericClient).

pub mod company;
pub mod job;
pub mod user;

pub use company::{COMPANIES, Company, CompanySearch, CompanySummary, NewCompany};
pub use job::{JOBS, Job, JobDetail, JobSearch, JobSummary, NewJob};
pub use user::{NewUser, USERS, User, UserSummary};
