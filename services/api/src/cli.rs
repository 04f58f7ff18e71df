use crate::commands::{
    run_candidate_export, run_candidate_list, run_classify, CandidateExportArgs,
    CandidateListArgs, ClassifyArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_tier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Tier",
    about = "Register candidates, classify skills into tiers, and triage results",
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
    /// Classify a set of skill flags without storing anything
    Classify(ClassifyArgs),
    /// Inspect or export stored candidates
    Candidates {
        #[command(subcommand)]
        command: CandidateCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CandidateCommand {
    /// Print stored candidates, newest first
    List(CandidateListArgs),
    /// Write stored candidates as CSV
    Export(CandidateExportArgs),
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
        Command::Classify(args) => {
            run_classify(args);
            Ok(())
        }
        Command::Candidates {
            command: CandidateCommand::List(args),
        } => run_candidate_list(args),
        Command::Candidates {
            command: CandidateCommand::Export(args),
        } => run_candidate_export(args),
    }
}
