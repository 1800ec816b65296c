//! hhctl-core - employer/vacancy extract-and-load for the hh.ru API
//!
//! Pulls employers and their vacancies over HTTP and writes them into a
//! two-table PostgreSQL schema (`companies`, `vacancies`), then answers a few
//! aggregate queries over what was loaded.
//!
//! All work is sequential: one employer at a time, one row at a time.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod normalize;

pub use api::{Employer, HhClient, Salary, Vacancy, VacancyPage};
pub use config::{ApiConfig, DatabaseConfig, HhConfig};
pub use db::{CompanyVacancyCount, DbManager, Statistics, VacancyListing};
pub use error::{HhError, Result};
pub use loader::{load, EmployerSource, LoadReport, VacancyStore};
pub use normalize::normalize_salary;
