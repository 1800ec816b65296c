//! `--action menu`: numbered text menu on stdin/stdout
//!
//! Loops until `0` or end of input. Clearing asks for a literal `yes`.
//! A failed command is reported and the menu comes back; only reading or
//! writing the terminal ends the loop with an error.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use hhctl_core::{DbManager, HhConfig};
use tracing::error;

use super::{clean, load, show};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    Show,
    Search,
    Clear,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Load),
            "2" => Some(Self::Show),
            "3" => Some(Self::Search),
            "4" => Some(Self::Clear),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Only the exact word `yes` confirms.
pub fn is_confirmed(input: &str) -> bool {
    input.trim() == "yes"
}

const MENU: &str = "\
1. Load employers and vacancies
2. Show statistics
3. Search vacancies by keyword
4. Clear database
0. Exit";

pub async fn run_menu<R, W>(config: &HhConfig, db: &DbManager, mut input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out)?;
        writeln!(out, "{}", MENU)?;
        let Some(line) = prompt(&mut input, out, "> ")? else {
            break;
        };

        let outcome = match MenuChoice::parse(&line) {
            Some(MenuChoice::Load) => load::load_all(config, db)
                .await
                .and_then(|report| load::print_report(&report, out)),
            Some(MenuChoice::Show) => show::run_show(db, out).await,
            Some(MenuChoice::Search) => {
                let Some(keyword) = prompt(&mut input, out, "Keyword: ")? else {
                    break;
                };
                search(db, keyword.trim(), out).await
            }
            Some(MenuChoice::Clear) => {
                let answer = prompt(
                    &mut input,
                    out,
                    "Type 'yes' to delete all companies and vacancies: ",
                )?;
                if answer.as_deref().is_some_and(is_confirmed) {
                    clean::run_clean(db, out).await
                } else {
                    writeln!(out, "Cancelled.")?;
                    Ok(())
                }
            }
            Some(MenuChoice::Exit) => break,
            None => {
                writeln!(out, "Unknown option '{}'.", line.trim())?;
                Ok(())
            }
        };

        if let Err(err) = outcome {
            error!("menu command failed: {:#}", err);
            writeln!(out, "Error: {:#}", err)?;
        }
    }

    Ok(())
}

async fn search<W: Write>(db: &DbManager, keyword: &str, out: &mut W) -> Result<()> {
    if keyword.is_empty() {
        writeln!(out, "No keyword given.")?;
        return Ok(());
    }
    let found = db
        .get_vacancies_with_keyword(keyword)
        .await
        .context("Failed to search vacancies")?;
    writeln!(out, "Vacancies matching '{}' ({}):", keyword, found.len())?;
    show::write_listings(&found, out)?;
    Ok(())
}

/// Print `label` and read one line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
