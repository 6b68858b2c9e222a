//! teller-formats: bank-specific statement plugins and the single-document
//! parse entry.

pub mod adcb_account;
pub mod adcb_card;
pub mod common;

use std::path::Path;

use anyhow::{Context, Result};

use teller_core::{run, FormatPlugin, ParseOptions, Statement};
use teller_extract::{load_dump, load_dump_bytes, reconstruct};

pub use adcb_account::AdcbAccount;
pub use adcb_card::AdcbCard;

/// Parse one statement dump file with one format plugin.
///
/// A missing dump is a precondition failure surfaced before any parsing.
/// Zero reconstructed lines is not: the statement comes back at its initial
/// value and the caller decides whether that constitutes failure.
pub fn parse_statement_dump<P>(
    path: impl AsRef<Path>,
    plugin: &P,
    options: &ParseOptions,
) -> Result<Statement>
where
    P: FormatPlugin<Output = Statement>,
{
    let path = path.as_ref();
    let pages = load_dump(path)?;
    let lines = reconstruct(&pages);
    run(&lines, plugin, options, Statement::default())
        .with_context(|| format!("parsing {}", path.display()))
}

/// Parse a statement dump already held in memory.
pub fn parse_statement_bytes<P>(
    bytes: &[u8],
    plugin: &P,
    options: &ParseOptions,
) -> Result<Statement>
where
    P: FormatPlugin<Output = Statement>,
{
    let pages = load_dump_bytes(bytes)?;
    let lines = reconstruct(&pages);
    Ok(run(&lines, plugin, options, Statement::default())?)
}
