use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Officer mobile
    pub uid: i32,    // Officer ID
    pub exp: usize,  // Expiration timestamp
}

/// Sign a bearer token for an officer, valid for `ttl`.
pub fn sign(
    officer_id: i32,
    mobile: &str,
    secret: &str,
    ttl: Duration,
) -> Result<(String, DateTime<Utc>)> {
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("token lifetime overflows the calendar"))?;

    let claims = Claims {
        sub: mobile.to_owned(),
        uid: officer_id,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, expires_at))
}

/// Verify and decode a bearer token. Expired tokens are rejected.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
