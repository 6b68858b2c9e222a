//! Statement accumulator and transaction records (bank-agnostic).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Statement dates are civil dates; the JSON surface renders them as ISO-8601
/// UTC midnight instants.
mod utc_instant {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(de)?;
        let date_part = s.split('T').next().unwrap_or_default();
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}

/// One parsed statement transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "utc_instant")]
    pub date: NaiveDate,
    /// Positive = income, negative = expense. Never zero.
    pub amount: f64,
    pub description: String,
    /// The raw reconstructed line(s) this record was derived from, in order.
    pub original_text: Vec<String>,
}

/// Statement coverage window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    #[serde(with = "utc_instant")]
    pub start: NaiveDate,
    #[serde(with = "utc_instant")]
    pub end: NaiveDate,
}

/// A transaction still under construction across physical lines.
///
/// Created when a row opens without its terminal amount/balance, extended by
/// continuation lines, and promoted or dropped before the parse finishes. It
/// lives inside the accumulator so the carry is owned by exactly one `run`
/// call; concurrent parses never observe each other's pending rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub original_text: Vec<String>,
}

impl PendingTransaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
            original_text: vec![line.into()],
        }
    }

    /// Extend the carried description with a continuation line.
    pub fn push_continuation(&mut self, text: &str, line: impl Into<String>) {
        if !text.is_empty() {
            if !self.description.is_empty() {
                self.description.push(' ');
            }
            self.description.push_str(text);
        }
        self.original_text.push(line.into());
    }
}

/// Accumulating output of one statement parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statement {
    pub holder: Option<String>,
    /// Trailing digit group of the account number; enough to match a
    /// statement to an account without storing the full number.
    pub account_suffix: Option<String>,
    /// Century prefix observed for this statement (20 for 2024).
    pub year_prefix: Option<i32>,
    pub period: Option<StatementPeriod>,
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    /// Call-scoped multi-line carry; plugins resolve or drop it before the
    /// parse finishes.
    #[serde(skip)]
    pub pending: Option<PendingTransaction>,
}

impl Statement {
    /// Record a classified transaction on the side its sign selects.
    ///
    /// Zero amounts are dropped: a zero row is a parse artifact, never a
    /// movement of money.
    pub fn record(&mut self, txn: Transaction) {
        if txn.amount == 0.0 {
            return;
        }
        if txn.amount > 0.0 {
            self.incomes.push(txn);
        } else {
            self.expenses.push(txn);
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(amount: f64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount,
            description: "test".to_string(),
            original_text: vec!["test".to_string()],
        }
    }

    #[test]
    fn test_record_routes_by_sign() {
        let mut stmt = Statement::default();
        stmt.record(txn(100.0));
        stmt.record(txn(-25.0));

        assert_eq!(stmt.incomes.len(), 1);
        assert_eq!(stmt.expenses.len(), 1);
        assert_eq!(stmt.incomes[0].amount, 100.0);
        assert_eq!(stmt.expenses[0].amount, -25.0);
        assert_eq!(stmt.transaction_count(), 2);
    }

    #[test]
    fn test_record_drops_zero_amounts() {
        let mut stmt = Statement::default();
        stmt.record(txn(0.0));
        assert_eq!(stmt.transaction_count(), 0);
    }

    #[test]
    fn test_dates_serialize_as_utc_instants() {
        let value = serde_json::to_value(txn(-150.0)).unwrap();
        assert_eq!(value["date"], "2024-01-01T00:00:00Z");
        assert_eq!(value["amount"], -150.0);

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, txn(-150.0));
    }

    #[test]
    fn test_pending_continuation_joins_description() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut pending = PendingTransaction::new(date, "Outward Transfer", "raw 1");
        pending.push_continuation("BENEFICIARY INTL LTD", "raw 2");
        pending.push_continuation("", "raw 3");

        assert_eq!(pending.description, "Outward Transfer BENEFICIARY INTL LTD");
        assert_eq!(pending.original_text, vec!["raw 1", "raw 2", "raw 3"]);
    }
}
