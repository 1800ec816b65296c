//! hh.ru REST client
//!
//! Two read-only calls: a single employer by id, and the paginated vacancy
//! search filtered by employer.
//!
//! Failure policy:
//! - transport errors (connect, TLS, body read) propagate as [`HhError::Http`]
//! - a non-2xx employer response yields `Ok(None)`
//! - the first vacancy page fails like an employer request: non-2xx gives an
//!   empty result, transport and decode errors propagate
//! - any failure on a later page ends the search with what was collected so far
//!
//! Employer ids are pushed as single path segments, so `/` in an id is
//! percent-encoded instead of changing the request path.

pub mod types;

pub use types::{Employer, Salary, Vacancy, VacancyPage};

use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{HhError, Result};

pub struct HhClient {
    client: Client,
    base_url: Url,
    per_page: u32,
    max_pages: u32,
}

impl HhClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            HhError::config(format!("invalid API base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HhError::config(format!(
                "API base URL '{}' cannot carry a path",
                config.base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            per_page: config.per_page.max(1),
            max_pages: config.max_pages.max(1),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `base_url` with `segments` appended, each percent-encoded as a whole.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET {base}/employers/{id}`
    pub async fn get_company(&self, employer_id: &str) -> Result<Option<Employer>> {
        let url = self.endpoint(&["employers", employer_id]);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(employer_id, status = status.as_u16(), "employer request failed");
            return Ok(None);
        }

        let body = response.text().await?;
        let employer = serde_json::from_str(&body)
            .map_err(|e| HhError::json(format!("employer {}", employer_id), e))?;
        Ok(Some(employer))
    }

    /// `GET {base}/vacancies?employer_id=..&page=..&per_page=..` until the
    /// last page, a failed page, or `max_pages` requests.
    pub async fn get_vacancies_by_company(&self, employer_id: &str) -> Result<Vec<Vacancy>> {
        let url = self.endpoint(&["vacancies"]);
        let mut vacancies = Vec::new();

        for page in 0..self.max_pages {
            let data = match self.fetch_page(&url, employer_id, page).await {
                Ok(Some(data)) => data,
                Ok(None) => return Ok(vacancies),
                Err(err) if page > 0 => {
                    warn!(
                        employer_id,
                        page,
                        error = %err,
                        collected = vacancies.len(),
                        "vacancy page failed, keeping collected items"
                    );
                    return Ok(vacancies);
                }
                Err(err) => return Err(err),
            };

            let last = data.is_last(page, self.per_page);
            debug!(employer_id, page, items = data.items.len(), last, "fetched vacancy page");
            vacancies.extend(data.items);

            if last {
                return Ok(vacancies);
            }
        }

        warn!(
            employer_id,
            max_pages = self.max_pages,
            collected = vacancies.len(),
            "stopped vacancy search at page limit"
        );
        Ok(vacancies)
    }

    /// One search page; `Ok(None)` on a non-2xx status.
    async fn fetch_page(
        &self,
        url: &Url,
        employer_id: &str,
        page: u32,
    ) -> Result<Option<VacancyPage>> {
        let params = [
            ("employer_id", employer_id.to_string()),
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        let response = self.client.get(url.clone()).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(employer_id, page, status = status.as_u16(), "vacancy page request failed");
            return Ok(None);
        }

        let body = response.text().await?;
        let data = serde_json::from_str(&body)
            .map_err(|e| HhError::json(format!("vacancies of {} page {}", employer_id, page), e))?;
        Ok(Some(data))
    }
}
