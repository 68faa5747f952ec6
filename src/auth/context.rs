use uuid::Uuid;

use super::Claims;
use crate::domain::UpsertUser;

/// Authenticated user context extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID (from JWT sub claim)
    pub user_id: Uuid,

    /// User email if available
    pub email: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, &'static str> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token")?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            profile_image_url: claims.profile_image_url.clone(),
        })
    }

    /// Upsert payload that keeps the stored profile fresh on each request
    pub fn as_upsert(&self) -> UpsertUser {
        UpsertUser {
            id: self.user_id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            aud: "authenticated".into(),
            iss: "ironbid".into(),
            iat: 0,
            exp: i64::MAX,
            email: Some("smith@example.com".into()),
            first_name: Some("Sam".into()),
            last_name: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn context_requires_uuid_subject() {
        assert!(AuthContext::from_claims(&claims("not-a-uuid")).is_err());

        let ctx =
            AuthContext::from_claims(&claims("00000000-0000-0000-0000-000000000001")).unwrap();
        assert_eq!(ctx.email.as_deref(), Some("smith@example.com"));
    }

    #[test]
    fn upsert_carries_profile_fields() {
        let ctx =
            AuthContext::from_claims(&claims("00000000-0000-0000-0000-000000000001")).unwrap();
        let upsert = ctx.as_upsert();
        assert_eq!(upsert.id, ctx.user_id);
        assert_eq!(upsert.first_name.as_deref(), Some("Sam"));
    }
}
