use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::claims::AuthClaims;

/// Validate an HS256 bearer token signed with the shared auth secret.
pub fn validate_token(token: &str, secret: &str) -> Result<AuthClaims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Identity providers stamp audience values we do not bind to.
    validation.validate_aud = false;

    let token_data = decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(sub: &str, exp: i64, secret: &str) -> String {
        let claims = AuthClaims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let secret = "shared_test_secret";
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = mint("6f0e1d7a-9f58-4cbe-8f0b-2f8d2f9e8a11", exp, secret);

        let claims = validate_token(&token, secret).unwrap();

        assert_eq!(claims.sub, "6f0e1d7a-9f58-4cbe-8f0b-2f8d2f9e8a11");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let secret = "shared_test_secret";
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = mint("someone", exp, secret);

        assert!(validate_token(&token, secret).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = mint("someone", exp, "secret_a");

        assert!(validate_token(&token, "secret_b").is_err());
    }
}
