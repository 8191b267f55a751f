//! Site content models: carousel slides, testimonials, brand ambassadors.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{AmbassadorId, CarouselItemId, TestimonialId};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CarouselItem {
    pub id: CarouselItemId,
    pub name: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Testimonial {
    pub id: TestimonialId,
    pub name: String,
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Ambassador {
    pub id: AmbassadorId,
    pub name: String,
    pub position: String,
    pub image_url: String,
    pub instagram_url: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
