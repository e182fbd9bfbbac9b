use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::{claims::Claims, repo_types::User};
use crate::{config::JwtConfig, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64).saturating_mul(60)),
        }
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            id: user.id,
            user_active_name: user.name.clone(),
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry. Expiry is exact: no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

/// Short reason reported to clients when a token is rejected.
pub fn rejection_reason(err: &jsonwebtoken::errors::Error) -> String {
    match err.kind() {
        ErrorKind::ExpiredSignature => "jwt expired".into(),
        ErrorKind::InvalidSignature => "invalid signature".into(),
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => "jwt malformed".into(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes: 60,
        })
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            name: "Alice".into(),
            password_hash: String::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip_carries_identity() {
        let keys = make_keys("dev-secret");
        let user = user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.user_active_name, "Alice");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = make_keys("secret-a").sign(&user()).expect("sign");
        let err = make_keys("secret-b").verify(&token).unwrap_err();
        assert_eq!(rejection_reason(&err), "invalid signature");
    }

    #[test]
    fn verify_rejects_token_older_than_ttl() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            id: Uuid::new_v4(),
            user_active_name: "Alice".into(),
            email: "a@x.com".into(),
            iat: issued.unix_timestamp() as usize,
            exp: (issued + TimeDuration::hours(1)).unix_timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();

        let err = keys.verify(&token).unwrap_err();
        assert_eq!(rejection_reason(&err), "jwt expired");
    }

    #[test]
    fn verify_rejects_garbage() {
        let err = make_keys("dev-secret").verify("not-a-token").unwrap_err();
        assert_eq!(rejection_reason(&err), "jwt malformed");
    }

    #[test]
    fn claims_use_wire_field_names() {
        let token = make_keys("dev-secret").sign(&user()).unwrap();
        let claims = make_keys("dev-secret").verify(&token).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userActiveName"], "Alice");
        assert_eq!(json["email"], "a@x.com");
    }
}
