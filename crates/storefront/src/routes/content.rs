//! Public site content handlers.
//!
//! Read-only views of the three content tables. Only active rows are
//! served, in display order; editing happens through the dashboard API.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::ContentRepository;
use crate::error::Result;
use crate::models::{Ambassador, CarouselItem, Testimonial};
use crate::state::AppState;

/// Active carousel items.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn carousel(State(state): State<AppState>) -> Result<Json<Vec<CarouselItem>>> {
    let items = ContentRepository::new(state.pool()).active_carousel().await?;
    Ok(Json(items))
}

/// Active testimonials.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn testimonials(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    let items = ContentRepository::new(state.pool())
        .active_testimonials()
        .await?;
    Ok(Json(items))
}

/// Active brand ambassadors.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn ambassadors(State(state): State<AppState>) -> Result<Json<Vec<Ambassador>>> {
    let items = ContentRepository::new(state.pool())
        .active_ambassadors()
        .await?;
    Ok(Json(items))
}
