// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims we read out of the server-issued access token.
/// All optional: the server decides what it puts in there.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Claims {
    /// Subject - the user id.
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration time as Unix timestamp.
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Reads the claims of a bearer token without checking its signature.
///
/// The client never holds the signing secret; the server stays the
/// authority on validity. This is only used to spot expired sessions early.
pub fn peek_claims(token: &str) -> Result<Claims, AppError> {
    let header = decode_header(token)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// True when the token carries an `exp` that is already in the past.
/// Tokens that are not JWTs, or have no `exp`, are treated as live.
pub fn is_expired(token: &str) -> bool {
    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        Err(_) => return false,
    };

    match peek_claims(token) {
        Ok(Claims { exp: Some(exp), .. }) => exp <= now,
        Ok(_) => false,
        Err(_) => {
            tracing::debug!("Access token is not a readable JWT; leaving expiry to the server");
            false
        }
    }
}
