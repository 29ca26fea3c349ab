use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthClaims {
    pub sub: String, // identity provider subject, a UUID
    pub exp: i64,    // Expiration timestamp
}
