use serde::{Deserialize, Serialize};

/// JWT claims issued by the authentication collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// User email - optional
    #[serde(default)]
    pub email: Option<String>,

    /// Profile fields carried for the user upsert - optional
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub profile_image_url: Option<String>,
}
