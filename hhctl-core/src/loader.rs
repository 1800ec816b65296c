//! Load employers and their vacancies into the store
//!
//! One employer at a time: fetch it, insert it, fetch its vacancies, insert
//! them one by one under the new local company id. An employer that cannot
//! be fetched is skipped; a store failure ends the run.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::{Employer, HhClient, Vacancy};
use crate::db::DbManager;
use crate::error::Result;

/// Where employers and vacancies come from.
#[async_trait]
pub trait EmployerSource {
    /// `Ok(None)` when the employer is unavailable.
    async fn get_company(&self, employer_id: &str) -> Result<Option<Employer>>;
    async fn get_vacancies_by_company(&self, employer_id: &str) -> Result<Vec<Vacancy>>;
}

/// Where they are written.
#[async_trait]
pub trait VacancyStore {
    /// Returns the local id assigned to the company.
    async fn insert_company(&self, company: &Employer) -> Result<i32>;
    async fn insert_vacancy(&self, vacancy: &Vacancy, company_id: i32) -> Result<()>;
}

#[async_trait]
impl EmployerSource for HhClient {
    async fn get_company(&self, employer_id: &str) -> Result<Option<Employer>> {
        HhClient::get_company(self, employer_id).await
    }

    async fn get_vacancies_by_company(&self, employer_id: &str) -> Result<Vec<Vacancy>> {
        HhClient::get_vacancies_by_company(self, employer_id).await
    }
}

#[async_trait]
impl VacancyStore for DbManager {
    async fn insert_company(&self, company: &Employer) -> Result<i32> {
        DbManager::insert_company(self, company).await
    }

    async fn insert_vacancy(&self, vacancy: &Vacancy, company_id: i32) -> Result<()> {
        DbManager::insert_vacancy(self, vacancy, company_id).await
    }
}

/// Outcome of one [`load`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub companies_loaded: usize,
    pub vacancies_loaded: usize,
    /// Employer ids that could not be fetched.
    pub skipped: Vec<String>,
}

pub async fn load<S, T>(source: &S, store: &T, employer_ids: &[String]) -> Result<LoadReport>
where
    S: EmployerSource + Sync + ?Sized,
    T: VacancyStore + Sync + ?Sized,
{
    let mut report = LoadReport::default();

    for employer_id in employer_ids {
        let company = match source.get_company(employer_id).await {
            Ok(Some(company)) => company,
            Ok(None) => {
                warn!(employer_id = %employer_id, "employer unavailable, skipping");
                report.skipped.push(employer_id.clone());
                continue;
            }
            Err(err) => {
                warn!(employer_id = %employer_id, error = %err, "failed to fetch employer, skipping");
                report.skipped.push(employer_id.clone());
                continue;
            }
        };

        let company_id = store.insert_company(&company).await?;
        report.companies_loaded += 1;

        // The company row stays even if its vacancies cannot be fetched. A
        // search that fails after its first page arrives here as `Ok` with
        // the pages collected so far.
        let vacancies = match source.get_vacancies_by_company(employer_id).await {
            Ok(vacancies) => vacancies,
            Err(err) => {
                warn!(employer_id = %employer_id, error = %err, "failed to fetch vacancies");
                Vec::new()
            }
        };

        for vacancy in &vacancies {
            store.insert_vacancy(vacancy, company_id).await?;
        }
        report.vacancies_loaded += vacancies.len();

        info!(
            employer_id = %employer_id,
            company_id,
            name = %company.name,
            vacancies = vacancies.len(),
            open_vacancies = ?company.open_vacancies,
            "loaded employer"
        );
    }

    debug!(?report, "load finished");
    Ok(report)
}
