//! teller-core: statement data contracts and the line-driven parse machine.

pub mod error;
pub mod machine;
pub mod options;
pub mod statement;

pub use error::DriveError;
pub use machine::{run, FormatPlugin};
pub use options::ParseOptions;
pub use statement::{PendingTransaction, Statement, StatementPeriod, Transaction};
