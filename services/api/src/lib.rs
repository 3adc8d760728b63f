mod cli;
mod infra;
mod routes;
mod score;
mod server;

use gap_score::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
