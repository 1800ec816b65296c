//! Runtime configuration
//!
//! Everything the client and the database manager need is collected into an
//! explicit [`HhConfig`] up front. Sources, highest priority first:
//!
//! 1. Process environment (`DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
//!    `DB_PASSWORD`, `DB_ADMIN_NAME`, `DB_MAX_CONNECTIONS`, `TEST_DB_NAME`,
//!    `HH_API_BASE_URL`, `HH_PER_PAGE`, `HH_MAX_PAGES`, `HH_USER_AGENT`,
//!    `HH_EMPLOYER_IDS`)
//! 2. `.env` in the current directory, then `~/.hhctl/.env`
//! 3. TOML file: explicit path, else `./hhctl.toml`, else `~/.hhctl/config.toml`
//! 4. Built-in defaults

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{HhError, Result};

/// hh.ru caps `per_page` at 100.
pub const MAX_PER_PAGE: u32 = 100;

/// Employers loaded when nothing else is configured.
pub const DEFAULT_EMPLOYER_IDS: [&str; 10] = [
    "1740", // Yandex
    "3529", // Sber
    "78638", // T-Bank
    "15478", // VK
    "2180", // Ozon
    "1057", // Kaspersky Lab
    "84585", // Avito
    "87021", // Wildberries
    "64174", // 2GIS
    "3776", // MTS
];

/// Load environment variables from .env files
///
/// The current directory wins over `~/.hhctl/.env`; dotenvy never overwrites
/// variables that are already set.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path.display().to_string());
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => loaded_from.push(env_file.display().to_string()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using process environment only");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }
}

/// Get the hhctl config directory path (~/.hhctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hhctl"))
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Database used for the administrative connection in `create_database`.
    pub admin_database: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "hh_vacancies".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            admin_database: "postgres".to_string(),
            max_connections: 1,
        }
    }
}

impl DatabaseConfig {
    /// Same server and credentials, different target database.
    pub fn with_database_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("admin_database", &self.admin_database)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_page: u32,
    /// Upper bound on vacancy search requests per employer.
    pub max_pages: u32,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hh.ru".to_string(),
            per_page: MAX_PER_PAGE,
            max_pages: 20,
            user_agent: format!("hhctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HhConfig {
    pub database: DatabaseConfig,
    /// Target database for integration tests only.
    pub test_database: Option<String>,
    pub api: ApiConfig,
    pub employer_ids: Vec<String>,
}

impl Default for HhConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            test_database: None,
            api: ApiConfig::default(),
            employer_ids: DEFAULT_EMPLOYER_IDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// TOML file
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub database: FileDatabase,
    pub api: FileApi,
    pub employers: FileEmployers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileDatabase {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub admin_database: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileApi {
    pub base_url: Option<String>,
    pub per_page: Option<u32>,
    pub max_pages: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileEmployers {
    pub ids: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| HhError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Explicit path if given, else the first of `./hhctl.toml` and
    /// `~/.hhctl/config.toml` that exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::from_path(path).map(Some);
        }

        let candidates = std::iter::once(PathBuf::from("hhctl.toml"))
            .chain(config_dir().map(|d| d.join("config.toml")));
        for path in candidates {
            if path.exists() {
                debug!("Loading config from {}", path.display());
                return Self::from_path(&path).map(Some);
            }
        }
        Ok(None)
    }
}

impl HhConfig {
    /// Load `.env` files, the TOML file and the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        load_dotenv();
        let file = FileConfig::discover(config_path)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Layer `file` and then `env` over the defaults.
    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(file) = file {
            let db = &mut config.database;
            if let Some(v) = file.database.host {
                db.host = v;
            }
            if let Some(v) = file.database.port {
                db.port = v;
            }
            if let Some(v) = file.database.name {
                db.name = v;
            }
            if let Some(v) = file.database.user {
                db.user = v;
            }
            if let Some(v) = file.database.admin_database {
                db.admin_database = v;
            }
            if let Some(v) = file.database.max_connections {
                db.max_connections = v;
            }

            let api = &mut config.api;
            if let Some(v) = file.api.base_url {
                api.base_url = v;
            }
            if let Some(v) = file.api.per_page {
                api.per_page = v;
            }
            if let Some(v) = file.api.max_pages {
                api.max_pages = v;
            }
            if let Some(v) = file.api.user_agent {
                api.user_agent = v;
            }

            if let Some(ids) = file.employers.ids {
                config.employer_ids = ids;
            }
        }

        let db = &mut config.database;
        if let Some(v) = env("DB_HOST") {
            db.host = v;
        }
        if let Some(v) = env("DB_PORT") {
            db.port = parse_number("DB_PORT", &v)?;
        }
        if let Some(v) = env("DB_NAME") {
            db.name = v;
        }
        if let Some(v) = env("DB_USER") {
            db.user = v;
        }
        if let Some(v) = env("DB_PASSWORD") {
            db.password = v;
        }
        if let Some(v) = env("DB_ADMIN_NAME") {
            db.admin_database = v;
        }
        if let Some(v) = env("DB_MAX_CONNECTIONS") {
            db.max_connections = parse_number("DB_MAX_CONNECTIONS", &v)?;
        }
        config.test_database = env("TEST_DB_NAME").filter(|v| !v.trim().is_empty());

        let api = &mut config.api;
        if let Some(v) = env("HH_API_BASE_URL") {
            api.base_url = v;
        }
        if let Some(v) = env("HH_PER_PAGE") {
            api.per_page = parse_number("HH_PER_PAGE", &v)?;
        }
        if let Some(v) = env("HH_MAX_PAGES") {
            api.max_pages = parse_number("HH_MAX_PAGES", &v)?;
        }
        if let Some(v) = env("HH_USER_AGENT") {
            api.user_agent = v;
        }
        if let Some(v) = env("HH_EMPLOYER_IDS") {
            config.employer_ids = parse_id_list(&v);
        }

        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        config.api.per_page = config.api.per_page.clamp(1, MAX_PER_PAGE);
        config.api.max_pages = config.api.max_pages.max(1);
        config.database.max_connections = config.database.max_connections.max(1);

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HhError::config(format!("{} must be a number, got '{}'", key, value)))
}

/// Split a comma separated list, dropping blanks.
fn parse_id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
