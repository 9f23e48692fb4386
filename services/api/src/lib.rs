mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use discount_offers::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
