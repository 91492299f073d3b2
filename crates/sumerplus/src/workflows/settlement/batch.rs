use super::aggregate::{aggregate, PartyRecord, PartyRole, Statement};
use super::normalizer::{clean_text, is_generic_owner_name, normalize_name};
use super::parser::{
    parse_deductions, parse_drivers, parse_loads, parse_owners, parse_truck_owners,
    select_load_sheet, DeductionRecord, LoadRecord, OwnerRecord, RowIssue,
};
use super::period::WorkPeriod;
use super::rates::{RateBook, RateDefaults, RateResolution};
use super::statement::render_statement;
use super::workbook::Workbook;
use crate::config::StatementConfig;
use crate::render::{Document, RenderError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Sheet to read loads from instead of the automatic choice.
    pub load_sheet: Option<String>,
    /// Anchors the fallback work period and `MM.DD` dates without a year.
    pub today: NaiveDate,
}

impl BatchOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            load_sheet: None,
            today,
        }
    }

    pub fn with_load_sheet(mut self, name: impl Into<String>) -> Self {
        self.load_sheet = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementStats {
    pub gross: Decimal,
    pub miles: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub name: String,
    pub role: PartyRole,
    pub unit: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub stats: StatementStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementBatch {
    pub period: WorkPeriod,
    pub load_sheet: String,
    pub documents: Vec<GeneratedDocument>,
    pub failures: Vec<DocumentFailure>,
    pub unmatched_loads: Vec<LoadRecord>,
    pub unmatched_deductions: Vec<DeductionRecord>,
    pub skipped_rows: Vec<RowIssue>,
}

impl StatementBatch {
    pub fn attempted(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} statements generated",
            self.documents.len(),
            self.attempted()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    #[error("workbook contains no sheets")]
    EmptyWorkbook,
}

/// Builds every statement the workbook supports and renders each to PDF.
pub fn generate_statements(
    workbook: &Workbook,
    options: &BatchOptions,
    rate_book: &dyn RateBook,
    config: &StatementConfig,
) -> Result<StatementBatch, SettlementError> {
    generate_statements_with(workbook, options, rate_book, config, Document::to_pdf)
}

/// Same as [`generate_statements`] with a caller-supplied PDF writer.
pub fn generate_statements_with<F>(
    workbook: &Workbook,
    options: &BatchOptions,
    rate_book: &dyn RateBook,
    config: &StatementConfig,
    mut write: F,
) -> Result<StatementBatch, SettlementError>
where
    F: FnMut(&Document) -> Result<Vec<u8>, RenderError>,
{
    let plan = plan_statements(workbook, options, rate_book, config)?;

    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for statement in &plan.statements {
        let name = file_name(statement, &plan.period);
        let document = render_statement(statement, &plan.period, &config.company_name);
        match write(&document) {
            Ok(bytes) => documents.push(GeneratedDocument {
                name,
                role: statement.role,
                unit: statement.unit.clone(),
                bytes,
                stats: StatementStats {
                    gross: statement.gross,
                    miles: statement.miles,
                    net: statement.net,
                },
            }),
            Err(error) => {
                warn!(document = %name, error = %error, "statement rendering failed");
                failures.push(DocumentFailure {
                    name,
                    error: error.to_string(),
                });
            }
        }
    }

    let batch = StatementBatch {
        period: plan.period,
        load_sheet: plan.load_sheet,
        documents,
        failures,
        unmatched_loads: plan.unmatched_loads,
        unmatched_deductions: plan.unmatched_deductions,
        skipped_rows: plan.skipped_rows,
    };
    info!(
        load_sheet = %batch.load_sheet,
        period = %batch.period.display(),
        generated = batch.documents.len(),
        failed = batch.failures.len(),
        unmatched_loads = batch.unmatched_loads.len(),
        skipped_rows = batch.skipped_rows.len(),
        "{}",
        batch.summary()
    );
    Ok(batch)
}

/// Statements and diagnostics for a workbook, before any rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementPlan {
    pub period: WorkPeriod,
    pub load_sheet: String,
    pub statements: Vec<Statement>,
    pub unmatched_loads: Vec<LoadRecord>,
    pub unmatched_deductions: Vec<DeductionRecord>,
    pub skipped_rows: Vec<RowIssue>,
}

pub fn plan_statements(
    workbook: &Workbook,
    options: &BatchOptions,
    rate_book: &dyn RateBook,
    config: &StatementConfig,
) -> Result<StatementPlan, SettlementError> {
    let sheet = select_load_sheet(workbook, options.load_sheet.as_deref())
        .ok_or(SettlementError::EmptyWorkbook)?;
    if let Some(preferred) = options.load_sheet.as_deref() {
        if !sheet.name.trim().eq_ignore_ascii_case(preferred.trim()) {
            warn!(requested = %preferred, using = %sheet.name, "requested load sheet not found");
        }
    }

    let load_sheet = parse_loads(sheet);
    let period = WorkPeriod::resolve(load_sheet.week_label.as_deref(), &sheet.name, options.today);
    let rates = RateResolution::new(rate_book, RateDefaults::from_config(config));

    let mut parties = owner_parties(workbook);
    parties.extend(driver_parties(workbook, &load_sheet.loads, &rates));

    let mut deductions: Vec<DeductionRecord> = config
        .fixed_deductions
        .iter()
        .map(|fixed| DeductionRecord::standing(fixed.description.clone(), fixed.amount))
        .collect();
    deductions.extend(load_sheet.fuel);
    deductions.extend(parse_deductions(workbook));

    for issue in &load_sheet.issues {
        debug!(sheet = %issue.sheet, row = issue.row, reason = issue.kind.message(), "skipped load row");
    }
    let aggregation = aggregate(&load_sheet.loads, &parties, &deductions, &rates);
    for load in &aggregation.unmatched_loads {
        warn!(
            row = load.row,
            load_number = %load.load_number,
            unit = load.unit.as_deref().unwrap_or("-"),
            "load matched no driver or owner"
        );
    }
    Ok(StatementPlan {
        period,
        load_sheet: sheet.name.clone(),
        statements: aggregation.statements,
        unmatched_loads: aggregation.unmatched_loads,
        unmatched_deductions: aggregation.unmatched_deductions,
        skipped_rows: load_sheet.issues,
    })
}

fn owner_display_name(raw: &str) -> String {
    let name = clean_text(raw);
    if name.is_empty() || is_generic_owner_name(&name) {
        "Owner".to_string()
    } else {
        name
    }
}

/// Owners from the truck mapping, enriched with matching `Owner` sheet rows, followed by owner
/// rows the mapping does not mention.
fn owner_parties(workbook: &Workbook) -> Vec<PartyRecord> {
    let records = parse_owners(workbook);
    let find = |name: &str| -> Option<&OwnerRecord> {
        let wanted = normalize_name(name);
        records.iter().find(|record| {
            record
                .name
                .as_deref()
                .is_some_and(|candidate| normalize_name(candidate) == wanted)
        })
    };

    let mut parties: Vec<PartyRecord> = Vec::new();
    for (unit, owner) in parse_truck_owners(workbook) {
        if parties
            .iter()
            .any(|party| party.unit.as_deref() == Some(unit.as_str()))
        {
            continue;
        }
        let record = find(&owner);
        parties.push(PartyRecord {
            role: PartyRole::Owner,
            unit: Some(unit),
            name: owner_display_name(&owner),
            email: None,
            company: record.and_then(|record| record.company.clone()),
            compensation: record.and_then(OwnerRecord::compensation),
        });
    }

    for record in &records {
        let Some(name) = record.name.as_deref().or(record.company.as_deref()) else {
            continue;
        };
        let already = parties.iter().any(|party| match (&record.unit, &party.unit) {
            (Some(unit), Some(existing)) => unit == existing,
            _ => normalize_name(&party.name) == normalize_name(name),
        });
        if already {
            continue;
        }
        parties.push(PartyRecord {
            role: PartyRole::Owner,
            unit: record.unit.clone(),
            name: owner_display_name(name),
            email: None,
            company: record.company.clone(),
            compensation: record.compensation(),
        });
    }
    parties
}

/// Drivers from the `Drivers` sheet, plus persisted configuration for load units the sheet does
/// not list. A sheet row with only a unit number is kept with an empty name unless the persisted
/// configuration names the driver.
fn driver_parties(
    workbook: &Workbook,
    loads: &[LoadRecord],
    rates: &RateResolution<'_>,
) -> Vec<PartyRecord> {
    let mut parties: Vec<PartyRecord> = parse_drivers(workbook)
        .into_iter()
        .map(|driver| {
            let persisted = driver.unit.as_deref().and_then(|unit| rates.persisted(unit));
            let name = driver
                .name
                .clone()
                .or_else(|| persisted.as_ref().map(|rate| clean_text(&rate.driver_name)))
                .unwrap_or_default();
            PartyRecord {
                role: PartyRole::Driver,
                compensation: driver.compensation(),
                email: driver
                    .email
                    .clone()
                    .or_else(|| persisted.as_ref().and_then(|rate| rate.driver_email.clone())),
                company: driver
                    .company
                    .clone()
                    .or_else(|| persisted.as_ref().and_then(|rate| rate.company.clone())),
                unit: driver.unit,
                name,
            }
        })
        .collect();

    for load in loads {
        let Some(unit) = load.unit.as_deref() else {
            continue;
        };
        if parties
            .iter()
            .any(|party| party.unit.as_deref() == Some(unit))
        {
            continue;
        }
        if let Some(rate) = rates.persisted(unit) {
            parties.push(PartyRecord {
                role: PartyRole::Driver,
                unit: Some(unit.to_string()),
                name: clean_text(&rate.driver_name),
                email: rate.driver_email.clone(),
                company: rate.company.clone(),
                compensation: None,
            });
        }
    }
    parties
}

fn file_component(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        .collect()
}

/// `OWNER_<name>_<unit>_<MM_DD_YYYY>_to_<MM_DD_YYYY>.pdf`, or `DRIVER_...`. The unit segment is
/// left out for statements matched by name.
pub fn file_name(statement: &Statement, period: &WorkPeriod) -> String {
    let mut parts = vec![statement.role.file_prefix().to_string()];
    let name = file_component(&statement.identity);
    if !name.is_empty() {
        parts.push(name);
    }
    if let Some(unit) = &statement.unit {
        parts.push(file_component(unit));
    }
    parts.push(period.file_stamp());
    format!("{}.pdf", parts.join("_"))
}
