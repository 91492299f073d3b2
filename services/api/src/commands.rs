use crate::infra::{parse_date, parse_wire};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use sumerplus::config::AppConfig;
use sumerplus::error::AppError;
use sumerplus::workflows::pricing::{
    estimate, AccountCount, AccountingMethod, AssetCount, BookkeepingSelections, Estimate,
    EstimateRequest, FilingStatus, TaxSelections, TaxSituation, TransactionVolume,
    ESTIMATE_DISCLAIMER,
};
use sumerplus::workflows::questionnaire::{
    evaluate, render_report, rules_for, AnswerSet, QuestionnaireKind,
};
use sumerplus::workflows::settlement::{
    generate_statements, BatchOptions, EmptyRateBook, StatementBatch, Workbook,
};

#[derive(Args, Debug)]
pub(crate) struct TaxEstimateArgs {
    /// State or district of residence, or `Non-USA`
    #[arg(long)]
    pub(crate) jurisdiction: String,
    /// Filing status, e.g. `married_joint`
    #[arg(long, value_parser = parse_wire::<FilingStatus>)]
    pub(crate) filing_status: Option<FilingStatus>,
    /// Claim dependents
    #[arg(long)]
    pub(crate) dependents: bool,
    /// Tax situation to include (repeatable), e.g. `self_emp`
    #[arg(long = "situation", value_parser = parse_wire::<TaxSituation>)]
    pub(crate) situations: Vec<TaxSituation>,
}

#[derive(Args, Debug)]
pub(crate) struct BookkeepingEstimateArgs {
    /// Monthly transaction volume bucket, e.g. `301-600`
    #[arg(long, value_parser = parse_wire::<TransactionVolume>)]
    pub(crate) volume: Option<TransactionVolume>,
    /// Number of bank and card accounts, e.g. `5-10`
    #[arg(long, value_parser = parse_wire::<AccountCount>)]
    pub(crate) accounts: Option<AccountCount>,
    /// `Cash` or `Accrual`
    #[arg(long, value_parser = parse_wire::<AccountingMethod>)]
    pub(crate) method: Option<AccountingMethod>,
    /// Reconcile merchant processors
    #[arg(long)]
    pub(crate) merchant_processors: bool,
    /// Track loans
    #[arg(long)]
    pub(crate) loans: bool,
    /// Number of fixed assets, e.g. `1-5`
    #[arg(long, value_parser = parse_wire::<AssetCount>)]
    pub(crate) assets: Option<AssetCount>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// `corporate` or `personal`
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: QuestionnaireKind,
    /// JSON file holding the answer object
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Write the rendered questionnaire report to this PDF path
    #[arg(long)]
    pub(crate) pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct StatementsArgs {
    /// Sheet exported as CSV, as `NAME=path.csv` (repeatable, in workbook order)
    #[arg(long = "sheet", value_parser = parse_sheet_arg, required = true)]
    pub(crate) sheets: Vec<(String, PathBuf)>,
    /// Read loads from this sheet instead of the latest `Week` sheet
    #[arg(long)]
    pub(crate) load_sheet: Option<String>,
    /// Reference date (YYYY-MM-DD) for the fallback work period
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Directory receiving the statement PDFs
    #[arg(long, default_value = "statements")]
    pub(crate) out: PathBuf,
}

fn parse_kind(raw: &str) -> Result<QuestionnaireKind, String> {
    QuestionnaireKind::parse(raw).ok_or_else(|| format!("unknown questionnaire kind '{raw}'"))
}

fn parse_sheet_arg(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected NAME=path.csv, got '{raw}'")),
    }
}

pub(crate) fn run_tax_estimate(args: TaxEstimateArgs) -> Result<(), AppError> {
    let request = EstimateRequest::TaxPrep(TaxSelections {
        jurisdiction: args.jurisdiction,
        filing_status: args.filing_status.unwrap_or_default(),
        has_dependents: args.dependents,
        situations: args.situations.into_iter().collect::<BTreeSet<_>>(),
    });
    print_lines(&estimate_lines(&estimate(&request)));
    Ok(())
}

pub(crate) fn run_bookkeeping_estimate(args: BookkeepingEstimateArgs) -> Result<(), AppError> {
    let request = EstimateRequest::Bookkeeping(BookkeepingSelections {
        transaction_volume: args.volume.unwrap_or_default(),
        account_count: args.accounts.unwrap_or_default(),
        accounting_method: args.method.unwrap_or_default(),
        merchant_processors: args.merchant_processors,
        loans: args.loans,
        assets: args.assets.unwrap_or_default(),
    });
    print_lines(&estimate_lines(&estimate(&request)));
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn estimate_lines(outcome: &Estimate) -> Vec<String> {
    match outcome {
        Estimate::Priced(quote) => {
            let mut lines = vec![format!("{} estimate", quote.category.label())];
            for item in &quote.line_items {
                lines.push(format!("  {:<48} ${:>6}", item.label, item.amount));
            }
            lines.push(format!("  {:<48} ${:>6}", "Estimated total", quote.total));
            lines.push(quote.deposit_note().to_string());
            lines.push(ESTIMATE_DISCLAIMER.to_string());
            lines
        }
        Estimate::CustomQuote { message, .. } => vec![format!("Custom quote: {message}")],
        Estimate::Unavailable { message, .. } => vec![format!("Unavailable: {message}")],
    }
}

fn invalid_data(error: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::InvalidData, error))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw).map_err(invalid_data)?;
    let assessment = evaluate(&answers, rules_for(args.kind));

    println!("{} questionnaire", args.kind.label());
    println!(
        "Risk status: {} ({})",
        assessment.tier.label(),
        assessment.tier.headline()
    );
    if assessment.findings.is_empty() {
        println!("Findings: none");
    } else {
        println!("Findings:");
        for finding in &assessment.findings {
            println!("- [{}] {}", finding.severity.label(), finding.message);
        }
    }

    if let Some(path) = args.pdf {
        let bytes = render_report(args.kind, &answers, &assessment).to_pdf()?;
        fs::write(&path, bytes)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_statements(args: StatementsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mut texts = Vec::with_capacity(args.sheets.len());
    for (name, path) in &args.sheets {
        texts.push((name.as_str(), fs::read_to_string(path)?));
    }
    let workbook = Workbook::from_csv_sheets(
        texts
            .iter()
            .map(|(name, text)| (*name, text.as_str())),
    )?;

    let mut options = BatchOptions::new(args.today.unwrap_or_else(|| Local::now().date_naive()));
    options.load_sheet = args.load_sheet;

    let batch = generate_statements(&workbook, &options, &EmptyRateBook, &config.statements)?;
    fs::create_dir_all(&args.out)?;
    for document in &batch.documents {
        fs::write(args.out.join(&document.name), &document.bytes)?;
    }
    print_lines(&batch_lines(&batch));
    Ok(())
}

pub(crate) fn batch_lines(batch: &StatementBatch) -> Vec<String> {
    let mut lines = vec![
        format!("Load sheet: {}", batch.load_sheet),
        format!("Work period: {}", batch.period.display()),
        batch.summary(),
    ];
    for document in &batch.documents {
        lines.push(format!(
            "  {} (gross {}, miles {}, check {})",
            document.name,
            document.stats.gross,
            document.stats.miles.normalize(),
            document.stats.net
        ));
    }
    for failure in &batch.failures {
        lines.push(format!("  FAILED {}: {}", failure.name, failure.error));
    }
    if !batch.unmatched_loads.is_empty() {
        lines.push(format!("Unmatched loads: {}", batch.unmatched_loads.len()));
        for load in &batch.unmatched_loads {
            lines.push(format!(
                "  row {}: load {} (unit {}, carrier {})",
                load.row,
                load.load_number,
                load.unit.as_deref().unwrap_or("-"),
                load.carrier.as_deref().unwrap_or("-")
            ));
        }
    }
    for issue in &batch.skipped_rows {
        lines.push(format!(
            "Skipped {} row {}: {}",
            issue.sheet,
            issue.row,
            issue.kind.message()
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use sumerplus::config::StatementConfig;

    #[test]
    fn priced_estimate_lists_items_and_deposit() {
        let outcome = estimate(&EstimateRequest::TaxPrep(TaxSelections {
            jurisdiction: "Texas".to_string(),
            ..TaxSelections::default()
        }));
        let lines = estimate_lines(&outcome);
        assert_eq!(lines[0], "Tax Preparation estimate");
        assert!(lines.iter().any(|line| line.contains("Estimated total") && line.ends_with("200")));
        assert!(lines.iter().any(|line| line.starts_with("Required Deposit")));

        let lines = estimate_lines(&estimate(&EstimateRequest::TaxPrep(TaxSelections {
            jurisdiction: "Non-USA".to_string(),
            ..TaxSelections::default()
        })));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Custom quote"));
    }

    #[test]
    fn batch_report_lists_unmatched_loads() {
        let workbook = Workbook::from_csv_sheets([(
            "Board",
            "PU date,Load Number,Gross,Total miles,Truck\n11/25/2025,L-9,100,50,12\n11/25/2025,,100,50,12\n",
        )])
        .expect("workbook");
        let batch = generate_statements(
            &workbook,
            &BatchOptions::new(NaiveDate::from_ymd_opt(2025, 11, 24).expect("date")),
            &EmptyRateBook,
            &StatementConfig::default(),
        )
        .expect("batch");

        let lines = batch_lines(&batch);
        assert_eq!(lines[0], "Load sheet: Board");
        assert_eq!(lines[2], "0 of 0 statements generated");
        assert!(lines.contains(&"  row 2: load L-9 (unit 12, carrier -)".to_string()));
        assert!(lines.contains(&"Skipped Board row 3: row has no load number".to_string()));
    }
}
