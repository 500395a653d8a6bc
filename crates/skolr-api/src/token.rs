// JWT claims decoding for session validation.
//
// The client is not the token issuer and has no verification key, so the
// payload is decoded with signature validation disabled -- the server
// remains the authority on token validity. The only thing the client
// derives from the claims is the expiry timestamp and the role, both of
// which gate UI behaviour, never server-side permissions.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::Role;

/// Claims embedded in a skolr access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: String,
    /// The user's login name.
    #[serde(default)]
    pub username: Option<String>,
    /// The user's role.
    pub role: Role,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    /// The expiry instant, or `None` if the timestamp is out of range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// `true` iff the token has expired at `now`. A token expiring exactly
    /// at `now` counts as expired -- validity requires `exp > now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Decode the claims payload of a bearer token without verifying the
/// signature.
///
/// Fails closed: any malformed input (not a JWT, bad base64, bad JSON,
/// missing claims) yields [`Error::InvalidToken`]. Expiry is deliberately
/// NOT validated here -- callers compare [`Claims::exp`] against their own
/// clock so that "expired" and "malformed" stay distinguishable.
pub fn decode_claims(token: &str) -> Result<Claims, Error> {
    let header = decode_header(token).map_err(|_| Error::InvalidToken)?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn mint(role: Role, exp: i64) -> String {
        let claims = Claims {
            sub: "42".into(),
            username: Some("jdoe".into()),
            role,
            exp,
            iat: Some(Utc::now().timestamp()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-the-real-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_claims_without_knowing_the_secret() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = mint(Role::Admin, exp);

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let token = mint(Role::Teacher, (Utc::now() + Duration::minutes(5)).timestamp());
        let claims = decode_claims(&token).unwrap();
        assert!(!claims.is_expired(Utc::now()));
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = mint(Role::Student, (Utc::now() - Duration::minutes(5)).timestamp());
        let claims = decode_claims(&token).unwrap();
        assert!(claims.is_expired(Utc::now()));
    }

    #[test]
    fn expiry_exactly_now_counts_as_expired() {
        let now = Utc::now();
        let token = mint(Role::Student, now.timestamp());
        let claims = decode_claims(&token).unwrap();
        assert!(claims.is_expired(now));
    }

    #[test]
    fn garbage_is_invalid_token_not_a_panic() {
        for bad in ["", "not-a-jwt", "a.b", "a.b.c.d", "🙂🙂🙂", "aaaa.bbbb.cccc"] {
            match decode_claims(bad) {
                Err(Error::InvalidToken) => {}
                other => panic!("expected InvalidToken for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn valid_structure_missing_claims_is_invalid() {
        // Well-formed JWT whose payload lacks the required claims.
        #[derive(serde::Serialize)]
        struct Empty {}
        let token = encode(
            &Header::default(),
            &Empty {},
            &EncodingKey::from_secret(b"x"),
        )
        .unwrap();
        assert!(matches!(decode_claims(&token), Err(Error::InvalidToken)));
    }
}
