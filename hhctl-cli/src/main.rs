//! hhctl - load hh.ru employers and vacancies into PostgreSQL
//!
//! A single `--action` flag picks what to do:
//! - `load`  fetch the configured employers and their vacancies
//! - `show`  print statistics and salary summaries
//! - `clean` delete every company and vacancy
//! - `menu`  interactive text menu

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hhctl_core::{DbManager, HhConfig};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "hhctl",
    author,
    version,
    about = "Load hh.ru employers and vacancies into PostgreSQL",
    long_about = "Fetch employers and their vacancies from the hh.ru API, store them in a \
                  companies/vacancies schema, and print simple salary statistics."
)]
struct Cli {
    /// Action to run: load, show, clean or menu
    #[arg(long, value_name = "ACTION")]
    action: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// TOML config file (default: ./hhctl.toml, then ~/.hhctl/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Load,
    Show,
    Clean,
    Menu,
}

const USAGE: &str = "\
Usage: hhctl --action <load|show|clean|menu>
  load   fetch the configured employers and their vacancies into the database
  show   print statistics and salary summaries
  clean  delete all companies and vacancies
  menu   interactive menu";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let action = match cli.action.as_deref() {
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(raw) => match Action::from_str(raw.trim(), true) {
            Ok(action) => action,
            Err(_) => {
                println!("Unknown action '{}'.\n{}", raw, USAGE);
                return Ok(());
            }
        },
    };

    let config = HhConfig::load(cli.config.as_deref())?;
    let db = DbManager::new(&config.database);

    let mut stdout = io::stdout().lock();
    let result = match action {
        Action::Load => commands::run_load(&config, &db, &mut stdout).await,
        Action::Show => commands::run_show(&db, &mut stdout).await,
        Action::Clean => commands::run_clean(&db, &mut stdout).await,
        Action::Menu => commands::run_menu(&config, &db, io::stdin().lock(), &mut stdout).await,
    };

    db.close().await;
    result
}
