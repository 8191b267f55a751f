//! Customer view for the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{Email, UserId};

/// A storefront customer as the dashboard sees them.
///
/// Credential fields never leave the storefront service; this view carries
/// profile data only.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
