mod app;
mod client;
mod config;
mod error;
mod telemetry;
mod ui;

use split_engine::TransactionId;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let launch = config::load()?;
    telemetry::init(&launch.config)?;

    let transaction_id = TransactionId::new(launch.transaction_id);
    let mut app = app::App::new(launch.config, transaction_id);
    match app.run().await? {
        Some(true) => println!("Splits saved for transaction {transaction_id}; refresh your transactions."),
        Some(false) => println!("Split editing cancelled; nothing changed."),
        None => {}
    }
    Ok(())
}
