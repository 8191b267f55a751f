//! Dashboard overview numbers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use ridgeline_core::StoreId;

use crate::db::StatsRepository;
use crate::error::Result;
use crate::middleware::RequireOwner;
use crate::models::StoreStats;
use crate::state::AppState;

use super::ensure_store_owner;

/// Revenue, sales and stock counts, and the monthly revenue graph.
///
/// # Errors
///
/// Returns 405 when the store is not the caller's.
#[instrument(skip(state), fields(owner = %owner, store_id = %store_id))]
pub async fn store_stats(
    State(state): State<AppState>,
    RequireOwner(owner): RequireOwner,
    Path(store_id): Path<StoreId>,
) -> Result<Json<StoreStats>> {
    ensure_store_owner(&state, store_id, &owner).await?;

    let stats = StatsRepository::new(state.pool())
        .store_stats(store_id)
        .await?;

    Ok(Json(stats))
}
