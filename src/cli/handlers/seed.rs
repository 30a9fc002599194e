//! Seed command handler
//!
//! Replaces all products and users with the demo data set.

use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::Services;

/// Handler for the seed command
pub struct SeedCommandHandler {
    config: Settings,
}

impl SeedCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        let pool = establish_async_connection_pool(&self.config.database).await?;
        let services = Services::new(Repositories::new(pool), &self.config.files);

        let report = services.seed.run().await.inspect_err(|e| {
            tracing::error!(error = ?e, "Seed failed");
        })?;

        println!(
            "✓ Seed executed: removed {} product(s), inserted {} product(s) and {} user(s)",
            report.products_removed, report.products_inserted, report.users_inserted
        );
        Ok(())
    }
}
