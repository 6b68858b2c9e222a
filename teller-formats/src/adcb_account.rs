//! ADCB current/savings account statement plugin.
//!
//! Expected reconstructed rows:
//!   MR JOHN A DOE 0123-456789-45-6
//!   Statement Period 01 JAN 2024 to 31 JAN 2024
//!   Date Value Date Description Amount Balance
//!   01 JAN 2024 01 JAN 2024 POS Settlement GROCERY STORE DUBAI AED 150 150.00 9,850.00
//!   03 JAN 2024 03 JAN 2024 Outward Telegraphic Transfer
//!   FT2400212345 BENEFICIARY INTL LTD 2,500.00 7,350.00
//!   Closing Balance 7,350.00
//!
//! Transfer rows wrap: the description continues on following lines until the
//! line carrying the amount/balance pair settles the row.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use teller_core::{
    FormatPlugin, ParseOptions, PendingTransaction, Statement, Transaction,
};

use crate::common::{is_income, match_period, parse_amount, parse_dd_mon_yyyy};

/// Scan position within an account statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// Before the transaction table header.
    Header,
    /// Inside the transaction table.
    Transactions,
    /// After the closing-balance marker; absorbing.
    Closed,
}

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^date\s+value\s+date\s+description\s+amount\s+balance$")
        .expect("valid table header pattern")
});

static CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^closing\s+balance\b").expect("valid closing pattern"));

static HOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<name>(?:MR|MRS|MS|DR)\.?\s+[A-Z][A-Z .]*?)\s+",
        r"\d+(?:-\d+)*-(?P<suffix>\d+)$"
    ))
    .expect("valid holder pattern")
});

static SETTLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<date>\d{1,2}\s+[A-Z]{3}\s+\d{4})\s+",
        r"(?P<value>\d{1,2}\s+[A-Z]{3}\s+\d{4})\s+",
        r"(?P<desc>.+?)\s+",
        r"(?P<amount>[\d,]+\.\d{2})\s+",
        r"(?P<balance>[\d,]+\.\d{2})$"
    ))
    .expect("valid settled row pattern")
});

static OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<date>\d{1,2}\s+[A-Z]{3}\s+\d{4})\s+",
        r"(?P<value>\d{1,2}\s+[A-Z]{3}\s+\d{4})\s+",
        r"(?P<desc>.+)$"
    ))
    .expect("valid open row pattern")
});

static SETTLING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<desc>.*?)\s*(?P<amount>[\d,]+\.\d{2})\s+(?P<balance>[\d,]+\.\d{2})$")
        .expect("valid settling row pattern")
});

/// Fields one row matcher pulled out of a physical line.
enum RowShape {
    /// Complete dated row carrying its own amount and balance.
    Settled {
        date: NaiveDate,
        description: String,
        amount: f64,
    },
    /// Dated row missing the amount/balance pair; opens a pending carry.
    Open { date: NaiveDate, description: String },
    /// Trailing text plus the amount/balance pair that settles a carry.
    Settling { description: String, amount: f64 },
}

fn match_settled(line: &str) -> Option<RowShape> {
    let caps = SETTLED.captures(line)?;
    let date = parse_dd_mon_yyyy(&caps["date"])?;
    let amount = parse_amount(&caps["amount"])?;
    Some(RowShape::Settled {
        date,
        description: caps["desc"].trim().to_string(),
        amount,
    })
}

fn match_open(line: &str) -> Option<RowShape> {
    let caps = OPEN.captures(line)?;
    let date = parse_dd_mon_yyyy(&caps["date"])?;
    Some(RowShape::Open {
        date,
        description: caps["desc"].trim().to_string(),
    })
}

fn match_settling(line: &str) -> Option<RowShape> {
    let caps = SETTLING.captures(line)?;
    let amount = parse_amount(&caps["amount"])?;
    Some(RowShape::Settling {
        description: caps["desc"].trim().to_string(),
        amount,
    })
}

/// Row shapes in priority order; the first matcher that recognizes the line
/// wins. A dated row with its own balance must win over the open-row shape,
/// which in turn must win over the bare settling tail.
const ROW_MATCHERS: &[(&str, fn(&str) -> Option<RowShape>)] = &[
    ("settled", match_settled),
    ("open", match_open),
    ("settling", match_settling),
];

const DEFAULT_INCOME_KEYWORDS: &[&str] = &[
    "deposit",
    "salary",
    "inward",
    "refund",
    "reversal",
    "interest credit",
    "cashback",
];

/// ADCB retail account statements.
pub struct AdcbAccount {
    /// Descriptions containing any of these are incomes; everything else in
    /// the table is an expense. Revisions of the bank's layout shuffle this
    /// list, so it is configuration, not engine logic.
    income_keywords: Vec<String>,
}

impl Default for AdcbAccount {
    fn default() -> Self {
        Self {
            income_keywords: DEFAULT_INCOME_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
        }
    }
}

impl AdcbAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_income_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            income_keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    fn signed(&self, description: &str, amount: f64) -> f64 {
        if is_income(description, &self.income_keywords) {
            amount
        } else {
            -amount
        }
    }

    /// Holder/account and period rows sit outside the table and may trail the
    /// closing marker, so they are matched in every state until found.
    fn extract_header(&self, line: &str, acc: &mut Statement) {
        if acc.holder.is_none() {
            if let Some(caps) = HOLDER.captures(line) {
                acc.holder = Some(caps["name"].trim().to_string());
                acc.account_suffix = Some(caps["suffix"].to_string());
            }
        }
        if acc.period.is_none() {
            if let Some(period) = match_period(line) {
                acc.year_prefix = Some(period.start.year() / 100);
                acc.period = Some(period);
            }
        }
    }

    fn scan_row(&self, line: &str, acc: &mut Statement) {
        let shape = ROW_MATCHERS
            .iter()
            .find_map(|(_, matcher)| matcher(line));

        match shape {
            Some(RowShape::Settled {
                date,
                description,
                amount,
            }) => {
                // A fresh dated row forces early completion of any carry; a
                // carry that never found its amount is dropped.
                acc.pending = None;
                acc.record(Transaction {
                    date,
                    amount: self.signed(&description, amount),
                    description,
                    original_text: vec![line.to_string()],
                });
            }
            Some(RowShape::Open { date, description }) => {
                acc.pending = Some(PendingTransaction::new(date, description, line));
            }
            Some(RowShape::Settling {
                description,
                amount,
            }) => {
                if let Some(mut pending) = acc.pending.take() {
                    pending.push_continuation(&description, line);
                    acc.record(Transaction {
                        date: pending.date,
                        amount: self.signed(&pending.description, amount),
                        description: pending.description,
                        original_text: pending.original_text,
                    });
                }
                // Without a carry this is a summary row; skip it.
            }
            None => {
                if let Some(pending) = acc.pending.as_mut() {
                    pending.push_continuation(line, line);
                }
                // Otherwise boilerplate (headers, legal text, page numbers):
                // skip it.
            }
        }
    }
}

impl FormatPlugin for AdcbAccount {
    type State = AccountState;
    type Output = Statement;

    fn initial_state(&self) -> AccountState {
        AccountState::Header
    }

    fn terminal_state(&self) -> AccountState {
        AccountState::Closed
    }

    fn transition(&self, state: AccountState, line: &str, _options: &ParseOptions) -> AccountState {
        match state {
            AccountState::Header if TABLE_HEADER.is_match(line) => AccountState::Transactions,
            AccountState::Transactions if CLOSING.is_match(line) => AccountState::Closed,
            other => other,
        }
    }

    fn action(
        &self,
        state: AccountState,
        line: &str,
        acc: &mut Statement,
        _options: &ParseOptions,
    ) -> Result<()> {
        self.extract_header(line, acc);

        if state == AccountState::Transactions {
            if CLOSING.is_match(line) {
                // A carry that never found its amount cannot become a
                // recordable transaction; drop it at the table's end.
                acc.pending = None;
            } else if !TABLE_HEADER.is_match(line) {
                // Later pages repeat the column header; it is not a row.
                self.scan_row(line, acc);
            }
        }
        Ok(())
    }

    fn keywords(&self) -> &[&str] {
        &["Statement Period", "POS Settlement", "Closing Balance"]
    }
}
