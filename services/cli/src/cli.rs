use crate::apply::{
    run_apply, run_login, run_quick_apply, run_select_job, run_status, show_authorizations,
    ApplyArgs, LoginArgs, SelectJobArgs,
};
use clap::{Parser, Subcommand};
use job_apply::config::{normalize_api_url, AppConfig};
use job_apply::error::AppError;
use job_apply::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "job-apply",
    about = "Walk through a job application from the command line",
    version
)]
struct Cli {
    /// Override the configured JSON store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Override the configured backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the selected job, the signed-in candidate and past applications (default command)
    Status,
    /// Store the job the next application targets
    SelectJob(SelectJobArgs),
    /// Store the candidate profile used to fill in applications
    Login(LoginArgs),
    /// Run the three-step application wizard and submit
    Apply(ApplyArgs),
    /// Apply with the saved profile resume in a single call
    QuickApply,
    /// List the accepted work authorization values
    Authorizations,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(store) = cli.store {
        config.wizard.store_path = store;
    }
    if let Some(api_url) = cli.api_url {
        config.api.base_url = normalize_api_url(&api_url)?;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        api = %config.api.base_url,
        store = %config.wizard.store_path.display(),
        "job-apply configured"
    );

    match cli.command.unwrap_or(Command::Status) {
        Command::Status => run_status(&config),
        Command::SelectJob(args) => run_select_job(&config, args),
        Command::Login(args) => run_login(&config, args),
        Command::Apply(args) => run_apply(&config, args).await,
        Command::QuickApply => run_quick_apply(&config).await,
        Command::Authorizations => {
            show_authorizations();
            Ok(())
        }
    }
}
