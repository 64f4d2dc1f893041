mod apply;
mod cli;
mod infra;

use job_apply::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
