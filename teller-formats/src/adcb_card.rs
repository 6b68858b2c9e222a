//! ADCB credit-card statement plugin.
//!
//! Expected reconstructed rows:
//!   CARDMEMBER MR JOHN A DOE
//!   Card Number XXXX-XXXX-XXXX-4523
//!   Statement Period 01 FEB 2024 to 29 FEB 2024
//!   Transaction Date Posting Date Description Amount
//!   01/02/24 03/02/24 AMAZON.AE DUBAI 299.00
//!   15/02/24 16/02/24 PAYMENT RECEIVED - THANK YOU 1,500.00 CR
//!   End of Statement
//!
//! Card rows carry two-digit years; the century comes from
//! `ParseOptions::year_prefix`. Credits are flagged with a trailing CR
//! marker, which wins over the keyword heuristic.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use teller_core::{FormatPlugin, ParseOptions, Statement, Transaction};

use crate::common::{is_income, match_period, parse_amount, parse_dd_mm_yy};

/// Scan position within a card statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Before the purchases table header.
    Header,
    /// Inside the purchases table.
    Purchases,
    /// After the end-of-statement marker; absorbing.
    Closed,
}

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^transaction\s+date\s+posting\s+date\s+description\s+amount$")
        .expect("valid table header pattern")
});

static END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^end\s+of\s+statement$").expect("valid end pattern"));

static CARDMEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cardmember\s+(?P<name>(?:MR|MRS|MS|DR)\.?\s+[A-Z][A-Z .]*)$")
        .expect("valid cardmember pattern")
});

static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^card\s+number\s+[X\d]{4}(?:-[X\d]{4})*-(?P<suffix>\d{4})$")
        .expect("valid card number pattern")
});

static ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<date>\d{2}/\d{2}/\d{2})\s+",
        r"(?P<post>\d{2}/\d{2}/\d{2})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<amount>[\d,]+\.\d{2})",
        r"(?:\s+(?P<credit>CR))?$"
    ))
    .expect("valid card row pattern")
});

const DEFAULT_CREDIT_KEYWORDS: &[&str] = &["payment received", "cashback", "refund", "reversal"];

/// ADCB credit-card statements.
pub struct AdcbCard {
    /// Fallback credit classification for rows missing the CR marker; see
    /// the account plugin for why this is configuration.
    credit_keywords: Vec<String>,
}

impl Default for AdcbCard {
    fn default() -> Self {
        Self {
            credit_keywords: DEFAULT_CREDIT_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
        }
    }
}

impl AdcbCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credit_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            credit_keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn extract_header(&self, line: &str, acc: &mut Statement) {
        if acc.holder.is_none() {
            if let Some(caps) = CARDMEMBER.captures(line) {
                acc.holder = Some(caps["name"].trim().to_string());
            }
        }
        if acc.account_suffix.is_none() {
            if let Some(caps) = CARD_NUMBER.captures(line) {
                acc.account_suffix = Some(caps["suffix"].to_string());
            }
        }
        if acc.period.is_none() {
            if let Some(period) = match_period(line) {
                acc.period = Some(period);
            }
        }
    }

    fn scan_row(&self, line: &str, acc: &mut Statement, options: &ParseOptions) {
        let Some(caps) = ROW.captures(line) else {
            // Boilerplate between purchase rows; skip silently.
            return;
        };
        let Some(date) = parse_dd_mm_yy(&caps["date"], options.year_prefix) else {
            // A dated-looking row with an impossible date is boilerplate too.
            return;
        };
        let Some(amount) = parse_amount(&caps["amount"]) else {
            return;
        };

        let description = caps["desc"].trim().to_string();
        let credit = caps.name("credit").is_some() || is_income(&description, &self.credit_keywords);

        if acc.year_prefix.is_none() {
            acc.year_prefix = Some(options.year_prefix);
        }
        acc.record(Transaction {
            date,
            amount: if credit { amount } else { -amount },
            description,
            original_text: vec![line.to_string()],
        });
    }
}

impl FormatPlugin for AdcbCard {
    type State = CardState;
    type Output = Statement;

    fn initial_state(&self) -> CardState {
        CardState::Header
    }

    fn terminal_state(&self) -> CardState {
        CardState::Closed
    }

    fn transition(&self, state: CardState, line: &str, _options: &ParseOptions) -> CardState {
        match state {
            CardState::Header if TABLE_HEADER.is_match(line) => CardState::Purchases,
            CardState::Purchases if END.is_match(line) => CardState::Closed,
            other => other,
        }
    }

    fn action(
        &self,
        state: CardState,
        line: &str,
        acc: &mut Statement,
        options: &ParseOptions,
    ) -> Result<()> {
        self.extract_header(line, acc);

        if state == CardState::Purchases && !END.is_match(line) {
            self.scan_row(line, acc, options);
        }
        Ok(())
    }

    fn keywords(&self) -> &[&str] {
        &["CARDMEMBER", "Card Number", "End of Statement"]
    }
}
