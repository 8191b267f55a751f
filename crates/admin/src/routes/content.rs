//! Site content management handlers.
//!
//! The dashboard edits the full row set for each kind; the storefront
//! serves only the active rows. Updates are partial, deletes are
//! idempotent and always answer 204.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use ridgeline_core::{AmbassadorId, CarouselItemId, TestimonialId};

use crate::db::{
    AmbassadorUpdate, CarouselItemUpdate, ContentRepository, NewAmbassador, NewCarouselItem,
    NewTestimonial, RepositoryError, TestimonialUpdate,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireOwner;
use crate::models::{Ambassador, CarouselItem, Testimonial};
use crate::state::AppState;

const fn default_active() -> bool {
    true
}

fn map_missing_row(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("content item not found".to_string()),
        other => AppError::Database(other),
    }
}

// ============================================================================
// Carousel
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCarouselRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCarouselRequest {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// All carousel slides, active or not, in display order.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn list_carousel(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
) -> Result<Json<Vec<CarouselItem>>> {
    let items = ContentRepository::new(state.pool()).list_carousel().await?;
    Ok(Json(items))
}

/// Create a carousel slide.
///
/// # Errors
///
/// Returns 400 when the name is missing.
#[instrument(skip(state, payload))]
pub async fn create_carousel(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Json(payload): Json<CreateCarouselRequest>,
) -> Result<(StatusCode, Json<CarouselItem>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let item = ContentRepository::new(state.pool())
        .create_carousel(&NewCarouselItem {
            name: payload.name.trim(),
            display_order: payload.display_order,
            is_active: payload.is_active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update the provided fields of a carousel slide.
///
/// # Errors
///
/// Returns 404 when the slide does not exist.
#[instrument(skip(state, payload), fields(id = %id))]
pub async fn update_carousel(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<CarouselItemId>,
    Json(payload): Json<UpdateCarouselRequest>,
) -> Result<Json<CarouselItem>> {
    let item = ContentRepository::new(state.pool())
        .update_carousel(
            id,
            &CarouselItemUpdate {
                name: payload.name,
                display_order: payload.display_order,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_missing_row)?;

    Ok(Json(item))
}

/// Delete a carousel slide.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_carousel(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<CarouselItemId>,
) -> Result<StatusCode> {
    ContentRepository::new(state.pool()).delete_carousel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Testimonials
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTestimonialRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTestimonialRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// All testimonials, active or not, in display order.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn list_testimonials(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
) -> Result<Json<Vec<Testimonial>>> {
    let items = ContentRepository::new(state.pool())
        .list_testimonials()
        .await?;
    Ok(Json(items))
}

/// Create a testimonial.
///
/// # Errors
///
/// Returns 400 when the name or content is missing.
#[instrument(skip(state, payload))]
pub async fn create_testimonial(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Json(payload): Json<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<Testimonial>)> {
    if payload.name.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Missing required fields: name and content are required".to_string(),
        ));
    }

    let item = ContentRepository::new(state.pool())
        .create_testimonial(&NewTestimonial {
            name: payload.name.trim(),
            position: payload.position.as_deref(),
            company: payload.company.as_deref(),
            content: payload.content.trim(),
            display_order: payload.display_order,
            is_active: payload.is_active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update the provided fields of a testimonial.
///
/// # Errors
///
/// Returns 404 when the testimonial does not exist.
#[instrument(skip(state, payload), fields(id = %id))]
pub async fn update_testimonial(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<TestimonialId>,
    Json(payload): Json<UpdateTestimonialRequest>,
) -> Result<Json<Testimonial>> {
    let item = ContentRepository::new(state.pool())
        .update_testimonial(
            id,
            &TestimonialUpdate {
                name: payload.name,
                position: payload.position,
                company: payload.company,
                content: payload.content,
                display_order: payload.display_order,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_missing_row)?;

    Ok(Json(item))
}

/// Delete a testimonial.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<TestimonialId>,
) -> Result<StatusCode> {
    ContentRepository::new(state.pool())
        .delete_testimonial(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Ambassadors
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateAmbassadorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub instagram_url: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAmbassadorRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub instagram_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// All ambassadors, active or not, in display order.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip_all)]
pub async fn list_ambassadors(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
) -> Result<Json<Vec<Ambassador>>> {
    let items = ContentRepository::new(state.pool())
        .list_ambassadors()
        .await?;
    Ok(Json(items))
}

/// Create an ambassador.
///
/// # Errors
///
/// Returns 400 when any required field is missing.
#[instrument(skip(state, payload))]
pub async fn create_ambassador(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Json(payload): Json<CreateAmbassadorRequest>,
) -> Result<(StatusCode, Json<Ambassador>)> {
    if payload.name.trim().is_empty()
        || payload.position.trim().is_empty()
        || payload.image_url.trim().is_empty()
        || payload.instagram_url.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Missing required fields: name, position, image_url, and instagram_url are required"
                .to_string(),
        ));
    }

    let item = ContentRepository::new(state.pool())
        .create_ambassador(&NewAmbassador {
            name: payload.name.trim(),
            position: payload.position.trim(),
            image_url: payload.image_url.trim(),
            instagram_url: payload.instagram_url.trim(),
            display_order: payload.display_order,
            is_active: payload.is_active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update the provided fields of an ambassador.
///
/// # Errors
///
/// Returns 404 when the ambassador does not exist.
#[instrument(skip(state, payload), fields(id = %id))]
pub async fn update_ambassador(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<AmbassadorId>,
    Json(payload): Json<UpdateAmbassadorRequest>,
) -> Result<Json<Ambassador>> {
    let item = ContentRepository::new(state.pool())
        .update_ambassador(
            id,
            &AmbassadorUpdate {
                name: payload.name,
                position: payload.position,
                image_url: payload.image_url,
                instagram_url: payload.instagram_url,
                display_order: payload.display_order,
                is_active: payload.is_active,
            },
        )
        .await
        .map_err(map_missing_row)?;

    Ok(Json(item))
}

/// Delete an ambassador.
///
/// # Errors
///
/// Returns 500 if the database query fails.
#[instrument(skip(state), fields(id = %id))]
pub async fn delete_ambassador(
    State(state): State<AppState>,
    RequireOwner(_): RequireOwner,
    Path(id): Path<AmbassadorId>,
) -> Result<StatusCode> {
    ContentRepository::new(state.pool())
        .delete_ambassador(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carousel_create_defaults_to_active() {
        let request: CreateCarouselRequest =
            serde_json::from_str(r#"{"name": "Summer drop"}"#).expect("parses");
        assert!(request.is_active);
        assert_eq!(request.display_order, 0);
    }

    #[test]
    fn testimonial_requires_name_and_content() {
        let request: CreateTestimonialRequest =
            serde_json::from_str(r#"{"name": "Chidi"}"#).expect("parses");
        assert!(request.content.is_empty());
    }

    #[test]
    fn ambassador_update_accepts_single_field() {
        let request: UpdateAmbassadorRequest =
            serde_json::from_str(r#"{"is_active": false}"#).expect("parses");
        assert_eq!(request.is_active, Some(false));
        assert!(request.name.is_none());
    }
}
