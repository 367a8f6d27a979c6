//! # Accounts Ledger
//!
//! Entry point of all three processes. The `service` setting picks the role:
//! - `gateway`: HTTP API forwarding to the backend services
//! - `users`: user records over the command channel
//! - `finance`: finance records over the command channel

use anyhow::Result;
use tracing::info;

use accounts_ledger::config::Settings;
use accounts_ledger::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    accounts_ledger::telemetry::init_tracing();

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        service = %settings.service,
        addr = %settings.server_addr(),
        storage = ?settings.storage,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!(
        service = %application.service(),
        addr = %application.local_addr()?,
        "Ready to accept connections"
    );
    application.run_until_stopped().await?;

    Ok(())
}
