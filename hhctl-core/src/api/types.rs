use serde::{Deserialize, Deserializer};

/// `GET /employers/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct Employer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Count hh.ru reports for the employer; logged next to what was loaded.
    #[serde(default)]
    pub open_vacancies: Option<u32>,
}

/// Salary fork as published on a vacancy. Either bound may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Salary {
    #[serde(default)]
    pub from: Option<i32>,
    #[serde(default)]
    pub to: Option<i32>,
}

/// One item of `GET /vacancies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vacancy {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    /// Vacancy title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub salary: Option<Salary>,
    /// Public page of the vacancy.
    #[serde(default)]
    pub alternate_url: Option<String>,
}

/// A page of vacancy search results.
///
/// hh.ru reports `pages`; some mirrors report `more` instead. Both are
/// honoured when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VacancyPage {
    #[serde(default)]
    pub items: Vec<Vacancy>,
    #[serde(default)]
    pub more: Option<bool>,
    #[serde(default)]
    pub pages: Option<u32>,
}

impl VacancyPage {
    /// Whether page `page` (zero based) ends the search.
    pub fn is_last(&self, page: u32, per_page: u32) -> bool {
        if (self.items.len() as u64) < u64::from(per_page) {
            return true;
        }
        if self.more == Some(false) {
            return true;
        }
        matches!(self.pages, Some(pages) if page + 1 >= pages)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employer_accepts_numeric_id() {
        let employer: Employer =
            serde_json::from_str(r#"{"id": 1740, "name": "Yandex"}"#).unwrap();
        assert_eq!(employer.id, "1740");
        assert!(employer.description.is_none());
    }

    #[test]
    fn test_vacancy_with_null_salary() {
        let vacancy: Vacancy = serde_json::from_str(
            r#"{"id": "93", "name": "Backend Engineer", "salary": null,
                "alternate_url": "https://hh.ru/vacancy/93", "area": {"id": "1"}}"#,
        )
        .unwrap();
        assert_eq!(vacancy.name.as_deref(), Some("Backend Engineer"));
        assert!(vacancy.salary.is_none());
    }

    fn page_of(len: usize) -> VacancyPage {
        VacancyPage {
            items: vec![Vacancy::default(); len],
            ..VacancyPage::default()
        }
    }

    #[test]
    fn test_short_page_is_last() {
        assert!(page_of(3).is_last(0, 10));
        assert!(page_of(0).is_last(0, 10));
    }

    #[test]
    fn test_empty_page_is_last_even_when_more_is_true() {
        let page = VacancyPage {
            more: Some(true),
            ..page_of(0)
        };
        assert!(page.is_last(4, 10));
    }

    #[test]
    fn test_full_page_with_more_false_is_last() {
        let page = VacancyPage {
            more: Some(false),
            ..page_of(10)
        };
        assert!(page.is_last(0, 10));
    }

    #[test]
    fn test_pages_marker() {
        let page = VacancyPage {
            pages: Some(2),
            ..page_of(10)
        };
        assert!(!page.is_last(0, 10));
        assert!(page.is_last(1, 10));
    }

    #[test]
    fn test_full_page_without_markers_continues() {
        assert!(!page_of(10).is_last(0, 10));
    }
}
