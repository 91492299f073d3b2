use crate::commands::{
    run_bookkeeping_estimate, run_score, run_statements, run_tax_estimate, BookkeepingEstimateArgs,
    ScoreArgs, StatementsArgs, TaxEstimateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sumerplus::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sumer Plus",
    about = "Tax intake scoring, fee estimates and trucking settlement statements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a tax preparation or bookkeeping engagement
    Estimate {
        #[command(subcommand)]
        command: EstimateCommand,
    },
    /// Score a questionnaire answer file and optionally write the PDF report
    Score(ScoreArgs),
    /// Generate settlement statement PDFs from exported workbook sheets
    Statements(StatementsArgs),
}

#[derive(Subcommand, Debug)]
enum EstimateCommand {
    /// Tax preparation estimate
    Tax(TaxEstimateArgs),
    /// Monthly bookkeeping estimate
    Bookkeeping(BookkeepingEstimateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate {
            command: EstimateCommand::Tax(args),
        } => run_tax_estimate(args),
        Command::Estimate {
            command: EstimateCommand::Bookkeeping(args),
        } => run_bookkeeping_estimate(args),
        Command::Score(args) => run_score(args),
        Command::Statements(args) => run_statements(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use sumerplus::workflows::pricing::{TaxSituation, TransactionVolume};

    #[test]
    fn statements_command_collects_repeated_sheets() {
        let cli = Cli::try_parse_from([
            "sumerplus-api",
            "statements",
            "--sheet",
            "Drivers=drivers.csv",
            "--sheet",
            "Week 11.17.25-11.23.25=week.csv",
            "--today",
            "2025-11-24",
            "--out",
            "out",
        ])
        .expect("arguments parse");

        let Some(Command::Statements(args)) = cli.command else {
            panic!("expected statements command");
        };
        assert_eq!(args.sheets.len(), 2);
        assert_eq!(args.sheets[1].0, "Week 11.17.25-11.23.25");
        assert_eq!(args.sheets[1].1, PathBuf::from("week.csv"));
        assert_eq!(args.out, PathBuf::from("out"));
    }

    #[test]
    fn estimate_flags_use_wire_names() {
        let cli = Cli::try_parse_from([
            "sumerplus-api",
            "estimate",
            "tax",
            "--jurisdiction",
            "Texas",
            "--situation",
            "self_emp",
            "--situation",
            "crypto",
        ])
        .expect("arguments parse");
        let Some(Command::Estimate {
            command: EstimateCommand::Tax(args),
        }) = cli.command
        else {
            panic!("expected tax estimate");
        };
        assert_eq!(args.situations, vec![TaxSituation::SelfEmp, TaxSituation::Crypto]);

        let cli = Cli::try_parse_from([
            "sumerplus-api",
            "estimate",
            "bookkeeping",
            "--volume",
            "601-1000",
        ])
        .expect("arguments parse");
        let Some(Command::Estimate {
            command: EstimateCommand::Bookkeeping(args),
        }) = cli.command
        else {
            panic!("expected bookkeeping estimate");
        };
        assert_eq!(args.volume, Some(TransactionVolume::UpTo1000));

        assert!(Cli::try_parse_from(["sumerplus-api", "statements", "--sheet", "no-equals"]).is_err());
    }
}
