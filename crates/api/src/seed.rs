//! Optional sample roster for a fresh install.

use kafra_core::transfer::sample_roster;
use kafra_db::repositories::AccountRepo;
use kafra_db::DbPool;

use crate::error::AppResult;
use crate::handlers::transfer::apply_import;

/// Import the sample roster if the store has no accounts.
///
/// Returns `true` if anything was written.
pub async fn seed_if_empty(pool: &DbPool) -> AppResult<bool> {
    if AccountRepo::count(pool).await? > 0 {
        tracing::debug!("Store not empty, skipping sample data");
        return Ok(false);
    }
    apply_import(pool, &sample_roster()).await?;
    tracing::info!("Sample roster seeded");
    Ok(true)
}
