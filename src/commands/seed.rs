//! Seed command - Inserts the sample expense set.

use std::sync::Arc;

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::domain::normalize_email;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{ExpenseManager, ExpenseService};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    let email = normalize_email(&args.email);
    let Some(owner) = uow.users().find_by_email(&email).await? else {
        tracing::warn!(%email, "Seed user not found; sign up first, then re-run seed");
        return Ok(());
    };

    let inserted = ExpenseManager::new(uow).seed_samples(owner.id).await?;
    if inserted > 0 {
        tracing::info!(inserted, owner = %owner.email, "Seeding complete");
    }

    Ok(())
}
