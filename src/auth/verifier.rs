use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use super::Claims;

/// Verifies HS256 bearer tokens against the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, iss: &str, aud: &str, exp: i64) -> String {
        let claims = Claims {
            sub: "00000000-0000-0000-0000-000000000001".into(),
            aud: aud.into(),
            iss: iss.into(),
            iat: 0,
            exp,
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    const FAR_FUTURE: i64 = 4102444800; // 2100-01-01

    #[test]
    fn accepts_valid_token() {
        let verifier = JwtVerifier::new("secret", "ironbid", "authenticated");
        let claims = verifier
            .verify(&token("secret", "ironbid", "authenticated", FAR_FUTURE))
            .unwrap();
        assert_eq!(claims.iss, "ironbid");
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = JwtVerifier::new("secret", "ironbid", "authenticated");
        assert!(verifier
            .verify(&token("other", "ironbid", "authenticated", FAR_FUTURE))
            .is_err());
    }

    #[test]
    fn rejects_wrong_issuer() {
        let verifier = JwtVerifier::new("secret", "ironbid", "authenticated");
        assert!(verifier
            .verify(&token("secret", "someone-else", "authenticated", FAR_FUTURE))
            .is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = JwtVerifier::new("secret", "ironbid", "authenticated");
        assert!(verifier
            .verify(&token("secret", "ironbid", "authenticated", 1))
            .is_err());
    }
}
