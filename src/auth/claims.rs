//! Unverified JWT payload decoding.
//!
//! The client never validates signatures - that is the server's job. It only
//! needs the embedded claims to bootstrap an identity and the expiry to know
//! when a persisted token is stale.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Identity claims embedded in the session token
#[derive(Clone, Debug, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry, seconds since epoch
    pub exp: i64,
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
}

impl Claims {
    /// A token is valid only while its expiry is strictly in the future
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// Decode the payload segment of a JWT without verifying the signature
pub fn decode_unverified(token: &str) -> Result<Claims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_header), Some(payload)) => payload,
        _ => bail!("token is not JWT-shaped"),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .context("token payload is not base64url")?;
    serde_json::from_slice(&bytes).context("token payload is not valid claims JSON")
}

/// Build a JWT-shaped token from a payload value. The signature is fake,
/// which is fine because decoding never checks it.
#[cfg(test)]
pub(crate) fn make_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
    format!("{}.{}.sig", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip() {
        let token = make_test_token(&serde_json::json!({
            "_id": "u1",
            "username": "alice",
            "exp": 4102444800i64,
            "channelId": "c1",
        }));
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.channel_id.as_deref(), Some("c1"));
        assert!(!claims.is_expired(Utc::now()));
    }

    #[test]
    fn test_expired_when_exp_in_past() {
        let token = make_test_token(&serde_json::json!({"_id": "u1", "exp": 1000}));
        let claims = decode_unverified(&token).unwrap();
        assert!(claims.is_expired(Utc::now()));
    }

    #[test]
    fn test_garbage_token_fails_to_decode() {
        assert!(decode_unverified("not-a-token").is_err());
        assert!(decode_unverified("a.%%%.c").is_err());
    }

    #[test]
    fn test_missing_exp_fails_to_decode() {
        let token = make_test_token(&serde_json::json!({"_id": "u1"}));
        assert!(decode_unverified(&token).is_err());
    }
}
