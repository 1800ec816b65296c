//! PostgreSQL persistence for companies and vacancies
//!
//! Each operation borrows a connection from the pool for its own statements
//! and gives it back; nothing is held between calls. The pool connects
//! lazily so `create_database` can run before the target database exists.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, FromRow, PgConnection, PgPool};
use tracing::{debug, info};

use crate::api::{Employer, Vacancy};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::normalize::normalize_salary;

const CREATE_COMPANIES: &str = r#"
    CREATE TABLE IF NOT EXISTS companies (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT
    )
"#;

const CREATE_VACANCIES: &str = r#"
    CREATE TABLE IF NOT EXISTS vacancies (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL DEFAULT '',
        salary INTEGER,
        link TEXT NOT NULL DEFAULT '',
        company_id INTEGER NOT NULL REFERENCES companies(id)
    )
"#;

const LISTING_SELECT: &str = r#"
    SELECT c.name AS company, v.title, v.salary, v.link
    FROM vacancies v
    INNER JOIN companies c ON v.company_id = c.id
"#;

/// Row counts of both tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub num_companies: i64,
    pub num_vacancies: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyVacancyCount {
    pub name: String,
    pub vacancies_count: i64,
}

/// A vacancy joined with its company name.
#[derive(Debug, Clone, FromRow)]
pub struct VacancyListing {
    pub company: String,
    pub title: String,
    pub salary: Option<i32>,
    pub link: String,
}

pub struct DbManager {
    pool: PgPool,
    config: DatabaseConfig,
}

impl DbManager {
    pub fn new(config: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(connect_options(config, &config.name));
        Self {
            pool,
            config: config.clone(),
        }
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn database_name(&self) -> &str {
        &self.config.name
    }

    /// Create the target database if it does not exist yet.
    ///
    /// Connects to the administrative database for the check. Two concurrent
    /// callers can both see the database as missing; the loser gets an error.
    pub async fn create_database(&self) -> Result<bool> {
        let options = connect_options(&self.config, &self.config.admin_database);
        let mut conn = PgConnection::connect_with(&options).await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(&self.config.name)
                .fetch_optional(&mut conn)
                .await?;

        let created = exists.is_none();
        if created {
            let statement = format!("CREATE DATABASE {}", quote_ident(&self.config.name));
            sqlx::query(&statement).execute(&mut conn).await?;
            info!(database = %self.config.name, "created database");
        } else {
            debug!(database = %self.config.name, "database already exists");
        }

        conn.close().await?;
        Ok(created)
    }

    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(CREATE_COMPANIES).execute(&self.pool).await?;
        sqlx::query(CREATE_VACANCIES).execute(&self.pool).await?;
        debug!("ensured companies and vacancies tables");
        Ok(())
    }

    /// Insert a company and return its local id.
    pub async fn insert_company(&self, company: &Employer) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO companies (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await?;

        debug!(company_id = id, employer_id = %company.id, name = %company.name, "inserted company");
        Ok(id)
    }

    pub async fn insert_vacancy(&self, vacancy: &Vacancy, company_id: i32) -> Result<()> {
        let title = vacancy.name.as_deref().unwrap_or_default();
        let salary = normalize_salary(vacancy.salary.as_ref());
        let link = vacancy.alternate_url.as_deref().unwrap_or_default();

        sqlx::query(
            "INSERT INTO vacancies (title, salary, link, company_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(title)
        .bind(salary)
        .bind(link)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        debug!(company_id, title, ?salary, "inserted vacancy");
        Ok(())
    }

    /// Delete every vacancy, then every company.
    pub async fn clear_database(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let vacancies = sqlx::query("DELETE FROM vacancies").execute(&mut *tx).await?;
        let companies = sqlx::query("DELETE FROM companies").execute(&mut *tx).await?;
        tx.commit().await?;

        info!(
            vacancies = vacancies.rows_affected(),
            companies = companies.rows_affected(),
            "cleared database"
        );
        Ok(())
    }

    pub async fn get_statistics(&self) -> Result<Statistics> {
        let num_companies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(&self.pool)
            .await?;
        let num_vacancies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vacancies")
            .fetch_one(&self.pool)
            .await?;

        Ok(Statistics {
            num_companies,
            num_vacancies,
        })
    }

    /// Every company with its vacancy count, including companies with none.
    pub async fn get_companies_and_vacancies_count(&self) -> Result<Vec<CompanyVacancyCount>> {
        let rows: Vec<CompanyVacancyCount> = sqlx::query_as(
            r#"
            SELECT c.name, COUNT(v.id) AS vacancies_count
            FROM companies c
            LEFT JOIN vacancies v ON c.id = v.company_id
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_all_vacancies(&self) -> Result<Vec<VacancyListing>> {
        let statement = format!("{} ORDER BY v.id", LISTING_SELECT);
        let rows: Vec<VacancyListing> = sqlx::query_as(&statement).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Rounded average over non-null salaries; `None` when there are none.
    pub async fn get_avg_salary(&self) -> Result<Option<i32>> {
        let avg: Option<i32> = sqlx::query_scalar("SELECT AVG(salary)::INTEGER FROM vacancies")
            .fetch_one(&self.pool)
            .await?;
        Ok(avg)
    }

    /// Vacancies paying strictly more than [`Self::get_avg_salary`].
    pub async fn get_vacancies_with_higher_salary(&self) -> Result<Vec<VacancyListing>> {
        let Some(average) = self.get_avg_salary().await? else {
            return Ok(Vec::new());
        };

        let statement = format!(
            "{} WHERE v.salary > $1 ORDER BY v.salary DESC, v.id",
            LISTING_SELECT
        );
        let rows: Vec<VacancyListing> = sqlx::query_as(&statement)
            .bind(average)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Vacancies whose title contains `keyword`, ignoring case.
    pub async fn get_vacancies_with_keyword(&self, keyword: &str) -> Result<Vec<VacancyListing>> {
        let pattern = format!("%{}%", escape_like(keyword));
        let statement = format!(
            "{} WHERE LOWER(v.title) LIKE LOWER($1) ORDER BY v.id",
            LISTING_SELECT
        );
        let rows: Vec<VacancyListing> = sqlx::query_as(&statement)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Close the pool, waiting for borrowed connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &DatabaseConfig, database: &str) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(database)
}

/// Double-quote an identifier for use in DDL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escape LIKE wildcards so the keyword matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
