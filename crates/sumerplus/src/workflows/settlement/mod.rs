//! Weekly settlement statements for trucking owners and drivers.
//!
//! A dispatch workbook is parsed into normalized load, roster and deduction records, loads are
//! grouped under the party that carried them, and each group becomes a paginated statement
//! rendered to PDF. Rows that cannot be attributed are reported rather than guessed.

pub mod aggregate;
pub mod batch;
mod normalizer;
pub mod parser;
pub mod period;
pub mod rates;
pub mod statement;
pub mod workbook;

#[cfg(test)]
mod tests;

pub use aggregate::{
    aggregate, Aggregation, MatchBasis, PartyRecord, PartyRole, Statement, StatementDeduction,
};
pub use batch::{
    file_name, generate_statements, generate_statements_with, plan_statements, BatchOptions,
    DocumentFailure, GeneratedDocument, SettlementError, StatementBatch, StatementPlan,
    StatementStats,
};
pub use normalizer::{normalize_unit, parse_amount};
pub use parser::{
    parse, parse_loads, parse_roster, select_load_sheet, DeductionRecord, DriverRecord,
    DriverRosterRow, LoadRecord, LoadSheet, NormalizedRecord, OwnerRecord, OwnerRosterRow, Roster,
    RowIssue, RowIssueKind, SheetRole, SheetSchema,
};
pub use period::WorkPeriod;
pub use rates::{
    CompensationModel, DriverRate, EmptyRateBook, RateBook, RateBookError, RateDefaults,
    RateResolution,
};
pub use statement::{displayed_totals, render_statement, DisplayedTotals};
pub use workbook::{Cell, Sheet, SheetRow, Workbook, WorkbookError, WorkbookPayload};
