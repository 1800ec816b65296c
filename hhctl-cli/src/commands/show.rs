//! `--action show`

use std::io::Write;

use anyhow::{Context, Result};
use hhctl_core::{CompanyVacancyCount, DbManager, Statistics, VacancyListing};

pub async fn run_show<W: Write>(db: &DbManager, out: &mut W) -> Result<()> {
    db.create_tables().await.context("Failed to create tables")?;

    let stats = db.get_statistics().await.context("Failed to read statistics")?;
    write_statistics(&stats, out)?;

    let counts = db
        .get_companies_and_vacancies_count()
        .await
        .context("Failed to count vacancies per company")?;
    write_company_counts(&counts, out)?;

    let average = db.get_avg_salary().await.context("Failed to compute average salary")?;
    writeln!(out)?;
    match average {
        Some(avg) => writeln!(out, "Average salary: {}", avg)?,
        None => writeln!(out, "Average salary: no salaries recorded")?,
    }

    let higher = db
        .get_vacancies_with_higher_salary()
        .await
        .context("Failed to list vacancies above average")?;
    writeln!(out)?;
    writeln!(out, "Vacancies above average ({}):", higher.len())?;
    write_listings(&higher, out)?;

    Ok(())
}

pub fn write_statistics<W: Write>(stats: &Statistics, out: &mut W) -> Result<()> {
    writeln!(out, "Companies: {}", stats.num_companies)?;
    writeln!(out, "Vacancies: {}", stats.num_vacancies)?;
    Ok(())
}

pub fn write_company_counts<W: Write>(counts: &[CompanyVacancyCount], out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Vacancies per company:")?;
    if counts.is_empty() {
        writeln!(out, "  (no companies)")?;
    }
    for row in counts {
        writeln!(out, "  {:<40} {:>6}", row.name, row.vacancies_count)?;
    }
    Ok(())
}

pub fn write_listings<W: Write>(listings: &[VacancyListing], out: &mut W) -> Result<()> {
    if listings.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for row in listings {
        let salary = row
            .salary
            .map(|s| s.to_string())
            .unwrap_or_else(|| "not specified".to_string());
        writeln!(out, "  {} | {} | {} | {}", row.company, row.title, salary, row.link)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn statistics_lines() {
        let stats = Statistics {
            num_companies: 3,
            num_vacancies: 17,
        };
        let text = render(|out| write_statistics(&stats, out));
        assert_eq!(text, "Companies: 3\nVacancies: 17\n");
    }

    #[test]
    fn company_counts_include_zero() {
        let counts = vec![
            CompanyVacancyCount {
                name: "Yandex".to_string(),
                vacancies_count: 12,
            },
            CompanyVacancyCount {
                name: "Idle Ltd".to_string(),
                vacancies_count: 0,
            },
        ];
        let text = render(|out| write_company_counts(&counts, out));
        assert!(text.contains("Yandex"));
        assert!(text.lines().any(|l| l.starts_with("  Idle Ltd") && l.ends_with(" 0")));
    }

    #[test]
    fn listing_without_salary() {
        let rows = vec![VacancyListing {
            company: "Acme".to_string(),
            title: "Backend Engineer".to_string(),
            salary: None,
            link: "https://hh.ru/vacancy/1".to_string(),
        }];
        let text = render(|out| write_listings(&rows, out));
        assert_eq!(
            text,
            "  Acme | Backend Engineer | not specified | https://hh.ru/vacancy/1\n"
        );
    }

    #[test]
    fn empty_listing() {
        let text = render(|out| write_listings(&[], out));
        assert_eq!(text, "  (none)\n");
    }
}
