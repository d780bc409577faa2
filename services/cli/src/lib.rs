mod cli;
mod commands;
mod infra;

use workforce_intel::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
