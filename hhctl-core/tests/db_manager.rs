//! Database tests against a real PostgreSQL server
//!
//! Run with the connection variables set and a throwaway database name:
//!   TEST_DB_NAME=hh_test DB_PASSWORD=... cargo test -p hhctl-core -- --ignored

use std::sync::{Mutex, MutexGuard};

use hhctl_core::{DbManager, Employer, HhConfig, Salary, Statistics, Vacancy};

// Tests share one database and clear it; run them one at a time.
static DB_LOCK: Mutex<()> = Mutex::new(());

fn serialize() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn setup() -> DbManager {
    let config = HhConfig::load(None).expect("config");
    let name = config
        .test_database
        .clone()
        .expect("TEST_DB_NAME required");
    let db = DbManager::new(&config.database.with_database_name(name));
    db.create_database().await.expect("create database");
    db.create_tables().await.expect("create tables");
    db.clear_database().await.expect("clear database");
    db
}

fn company(name: &str) -> Employer {
    Employer {
        id: "1".to_string(),
        name: name.to_string(),
        description: Some(format!("{} description", name)),
        open_vacancies: None,
    }
}

fn vacancy(title: &str, from: Option<i32>, to: Option<i32>) -> Vacancy {
    Vacancy {
        id: None,
        name: Some(title.to_string()),
        salary: Some(Salary { from, to }),
        alternate_url: Some(format!("https://hh.ru/vacancy/{}", title.len())),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn create_database_is_idempotent() {
    let _guard = serialize();
    let db = setup().await;

    let created = db.create_database().await.unwrap();
    assert!(!created);

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::TEXT FROM information_schema.tables WHERE table_schema = 'public'",
    )
    .fetch_all(db.pool())
    .await
    .unwrap();
    assert!(tables.iter().any(|t| t == "companies"));
    assert!(tables.iter().any(|t| t == "vacancies"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn insert_and_count() {
    let _guard = serialize();
    let db = setup().await;

    let company_id = db.insert_company(&company("Apple")).await.unwrap();
    db.insert_vacancy(&vacancy("Frontend Developer", Some(120_000), Some(180_000)), company_id)
        .await
        .unwrap();

    let stats = db.get_statistics().await.unwrap();
    assert_eq!(
        stats,
        Statistics {
            num_companies: 1,
            num_vacancies: 1
        }
    );

    let salary: Option<i32> = sqlx::query_scalar("SELECT salary FROM vacancies")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(salary, Some(120_000));
}

#[tokio::test]
#[ignore = "requires database"]
async fn vacancy_defaults_for_missing_fields() {
    let _guard = serialize();
    let db = setup().await;

    let company_id = db.insert_company(&company("Nameless")).await.unwrap();
    db.insert_vacancy(&Vacancy::default(), company_id).await.unwrap();

    let all = db.get_all_vacancies().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "");
    assert_eq!(all[0].link, "");
    assert_eq!(all[0].salary, None);
}

#[tokio::test]
#[ignore = "requires database"]
async fn clear_database_empties_both_tables() {
    let _guard = serialize();
    let db = setup().await;

    let company_id = db.insert_company(&company("Google")).await.unwrap();
    db.insert_vacancy(&vacancy("SRE", Some(200_000), None), company_id)
        .await
        .unwrap();
    db.clear_database().await.unwrap();

    let stats = db.get_statistics().await.unwrap();
    assert_eq!(stats.num_companies, 0);
    assert_eq!(stats.num_vacancies, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn companies_with_zero_vacancies_are_counted() {
    let _guard = serialize();
    let db = setup().await;

    let busy = db.insert_company(&company("Busy")).await.unwrap();
    db.insert_company(&company("Idle")).await.unwrap();
    db.insert_vacancy(&vacancy("One", None, None), busy).await.unwrap();
    db.insert_vacancy(&vacancy("Two", None, None), busy).await.unwrap();

    let counts = db.get_companies_and_vacancies_count().await.unwrap();
    let counts: Vec<(String, i64)> = counts
        .into_iter()
        .map(|c| (c.name, c.vacancies_count))
        .collect();
    assert_eq!(
        counts,
        vec![("Busy".to_string(), 2), ("Idle".to_string(), 0)]
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn average_and_strictly_higher_salary() {
    let _guard = serialize();
    let db = setup().await;

    let company_id = db.insert_company(&company("Solo")).await.unwrap();
    db.insert_vacancy(&vacancy("Only", Some(150_000), None), company_id)
        .await
        .unwrap();

    assert_eq!(db.get_avg_salary().await.unwrap(), Some(150_000));
    assert!(db.get_vacancies_with_higher_salary().await.unwrap().is_empty());

    db.insert_vacancy(&vacancy("Better", Some(250_000), None), company_id)
        .await
        .unwrap();
    db.insert_vacancy(&vacancy("Unknown", None, None), company_id)
        .await
        .unwrap();

    assert_eq!(db.get_avg_salary().await.unwrap(), Some(200_000));
    let higher = db.get_vacancies_with_higher_salary().await.unwrap();
    assert_eq!(higher.len(), 1);
    assert_eq!(higher[0].title, "Better");
    assert_eq!(higher[0].company, "Solo");
}

#[tokio::test]
#[ignore = "requires database"]
async fn average_without_salaries_is_none() {
    let _guard = serialize();
    let db = setup().await;

    assert_eq!(db.get_avg_salary().await.unwrap(), None);
    assert!(db.get_vacancies_with_higher_salary().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn keyword_search_ignores_case() {
    let _guard = serialize();
    let db = setup().await;

    let company_id = db.insert_company(&company("Acme")).await.unwrap();
    db.insert_vacancy(&vacancy("Backend Engineer", None, None), company_id)
        .await
        .unwrap();
    db.insert_vacancy(&vacancy("Designer", None, None), company_id)
        .await
        .unwrap();

    for keyword in ["engineer", "ENGINEER", "Engineer"] {
        let found = db.get_vacancies_with_keyword(keyword).await.unwrap();
        assert_eq!(found.len(), 1, "keyword {}", keyword);
        assert_eq!(found[0].title, "Backend Engineer");
    }

    assert!(db.get_vacancies_with_keyword("%").await.unwrap().is_empty());
}
