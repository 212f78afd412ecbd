use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Identity};
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// Built once from [`JwtConfig`] at start-up; the secret is never mutated
/// afterwards. There is no server-side session: a token is valid exactly
/// as long as its signature matches and `exp` lies in the future.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl TokenService {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            ttl: Duration::from_secs(u64::try_from(cfg.ttl_minutes).unwrap_or(0).saturating_mul(60)),
        }
    }

    pub fn issue(&self, identity: &Identity) -> anyhow::Result<String> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    pub(crate) fn issue_at(&self, identity: &Identity, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            user_id: identity.user_id,
            username: identity.username.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %identity.user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_service(secret: &str, issuer: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_minutes: 60,
        })
    }

    fn alice() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            username: "alice_01".into(),
        }
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let tokens = make_service("dev-secret", "test-issuer");
        let who = alice();
        let token = tokens.issue(&who).expect("sign");
        let claims = tokens.verify(&token).expect("verify");
        assert_eq!(claims.identity(), who);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = make_service("dev-secret", "iss");
        let issued = OffsetDateTime::now_utc() - TimeDuration::minutes(61);
        let token = tokens.issue_at(&alice(), issued).expect("sign");
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn token_just_inside_horizon_is_accepted() {
        let tokens = make_service("dev-secret", "iss");
        let issued = OffsetDateTime::now_utc() - TimeDuration::minutes(59);
        let token = tokens.issue_at(&alice(), issued).expect("sign");
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let good = make_service("secret-a", "iss");
        let bad = make_service("secret-b", "iss");
        let token = good.issue(&alice()).expect("sign");
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let good = make_service("same-secret", "good-iss");
        let bad = make_service("same-secret", "bad-iss");
        let token = good.issue(&alice()).expect("sign");
        assert!(bad.verify(&token).is_err());
    }

    #[test]
    fn malformed_and_tampered_tokens_are_rejected() {
        let tokens = make_service("dev-secret", "iss");
        assert!(tokens.verify("not.a.jwt").is_err());
        assert!(tokens.verify("").is_err());

        let token = tokens.issue(&alice()).expect("sign");
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = tokens.issue(&Identity {
            user_id: Uuid::new_v4(),
            username: "mallory".into(),
        })
        .unwrap();
        // payload of one token, signature of another
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;
        assert!(tokens.verify(&parts.join(".")).is_err());
    }
}
