use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::clock::Clock;
use crate::application::interface::token::TokenCodec;
use crate::domain::entities::id::Id;
use crate::domain::entities::password_reset::ResetProof;
use crate::domain::entities::session::{Role, SessionClaims};

const RESET_PURPOSE: &str = "password_reset";

#[derive(Debug, Serialize, Deserialize)]
struct SessionTokenClaims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    role: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetProofClaims {
    sub: String,
    cid: String,
    purpose: String,
    iat: i64,
    exp: i64,
}

/// HS256 codec for session tokens and reset proofs. The two claim sets have
/// disjoint required fields, so one kind never decodes as the other.
///
/// Expiry is judged by the injected clock rather than by the library, so a
/// token is valid while `now <= exp`.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    fn sign<T: Serialize>(&self, claims: &T) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| AppError::TokenError(err.to_string()))
    }

    fn is_expired(&self, exp: i64) -> AppResult<bool> {
        Ok(self.clock.now() > timestamp(exp)?)
    }
}

fn timestamp(secs: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| AppError::TokenError("Timestamp out of range".to_string()))
}

fn parse_role(role: &str) -> AppResult<Role> {
    match role {
        "user" => Ok(Role::User),
        "admin" => Ok(Role::Admin),
        other => Err(AppError::TokenError(format!("Unknown role: {other}"))),
    }
}

impl TokenCodec for JwtTokenCodec {
    fn sign_session(&self, claims: &SessionClaims) -> AppResult<String> {
        self.sign(&SessionTokenClaims {
            sub: claims.subject.clone(),
            email: claims.email.clone(),
            role: claims.role.as_str().to_string(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        })
    }

    fn verify_session(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<SessionTokenClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!("Session token rejected: {}", err);
            AppError::Unauthorized
        })?;
        let claims = data.claims;
        if self.is_expired(claims.exp).map_err(|_| AppError::Unauthorized)? {
            debug!("Session token for {} expired", claims.sub);
            return Err(AppError::Unauthorized);
        }
        Ok(SessionClaims {
            role: parse_role(&claims.role).map_err(|_| AppError::Unauthorized)?,
            subject: claims.sub,
            email: claims.email,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    fn sign_reset_proof(&self, proof: &ResetProof) -> AppResult<String> {
        self.sign(&ResetProofClaims {
            sub: proof.user_id.to_string(),
            cid: proof.challenge_id.to_string(),
            purpose: RESET_PURPOSE.to_string(),
            iat: proof.issued_at.timestamp(),
            exp: proof.expires_at.timestamp(),
        })
    }

    fn verify_reset_proof(&self, token: &str) -> AppResult<ResetProof> {
        let data = decode::<ResetProofClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!("Reset proof rejected: {}", err);
            AppError::InvalidResetProof
        })?;
        let claims = data.claims;
        let expired = self.is_expired(claims.exp).map_err(|_| AppError::InvalidResetProof)?;
        if claims.purpose != RESET_PURPOSE || expired {
            return Err(AppError::InvalidResetProof);
        }
        Ok(ResetProof {
            user_id: Id::try_from(claims.sub.as_str()).map_err(|_| AppError::InvalidResetProof)?,
            challenge_id: Id::try_from(claims.cid.as_str()).map_err(|_| AppError::InvalidResetProof)?,
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }
}
