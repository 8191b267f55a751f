//! Customer account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::{Email, UserId};

/// A storefront customer.
///
/// The password hash is intentionally absent; repositories that need it
/// return it alongside the user instead of embedding it here, so the model
/// can be serialized into responses directly.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub height: Option<String>,
    pub cap_size: Option<String>,
    pub shirt_size: Option<String>,
    pub profile_image: Option<String>,
    pub is_temp_password: bool,
    #[serde(skip_serializing)]
    pub temp_password_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_omits_temp_password_timestamp() {
        let user = User {
            id: UserId::generate(),
            full_name: "Ada Obi".to_string(),
            email: "ada@example.com".parse().expect("valid email"),
            phone: "+2348012345678".to_string(),
            height: None,
            cap_size: None,
            shirt_size: Some("M".to_string()),
            profile_image: None,
            is_temp_password: true,
            temp_password_created_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).expect("serializes");
        assert!(json.get("temp_password_created_at").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["is_temp_password"], serde_json::json!(true));
    }
}
