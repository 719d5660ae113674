use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;

use super::directory::OfficerDirectory;
use crate::config::AuthConfig;
use crate::entity::officer;
use crate::store::ServiceError;
use crate::utils::{hash, jwt};

/// Result of a successful login. The token is the only session state; the server keeps none.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub officer: officer::Model,
}

/// Exchanges officer credentials for a bearer token.
///
/// There is no server-side revocation list: a token stays valid until it expires even if the
/// client discards it.
pub struct SessionAuthenticator<'a, C: ConnectionTrait> {
    directory: OfficerDirectory<'a, C>,
    auth: &'a AuthConfig,
}

impl<'a, C: ConnectionTrait> SessionAuthenticator<'a, C> {
    pub fn new(directory: OfficerDirectory<'a, C>, auth: &'a AuthConfig) -> Self {
        Self { directory, auth }
    }

    pub async fn login(&self, mobile: &str, password: &str) -> Result<Session, ServiceError> {
        let officer = self.directory.find_by_mobile(mobile.trim()).await?;

        // Unknown mobiles still pay for one hash verification.
        let stored_hash = officer
            .as_ref()
            .map_or(hash::DUMMY_HASH, |o| o.password.as_str());
        let matches = hash::verify_password(password, stored_hash).map_err(|e| {
            tracing::error!("Stored password hash is unreadable: {}", e);
            ServiceError::Corrupt("password hash".into())
        })?;

        let officer = match officer {
            Some(officer) if matches => officer,
            _ => return Err(ServiceError::Unauthenticated),
        };

        let (token, expires_at) =
            jwt::sign(officer.id, &officer.mobile, &self.auth.jwt_secret, self.auth.token_ttl())
                .map_err(|e| ServiceError::Corrupt(format!("JWT sign error: {e}")))?;

        tracing::info!(officer_id = officer.id, "Officer logged in");
        Ok(Session {
            token,
            expires_at,
            officer,
        })
    }
}
