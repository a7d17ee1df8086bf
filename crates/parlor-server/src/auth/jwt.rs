//! JWT issuance and validation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use parlor_core::{Player, PlayerId};

use crate::config::JwtConfig;

/// Claims embedded in every token.
///
/// `id` is the player's UUID in canonical string form; a token whose
/// `id` does not parse as a UUID is rejected even when the signature
/// checks out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The player's id (canonical UUID string).
    pub id: String,
    /// The player's display name.
    pub name: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why a presented token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token identity is not a valid player id")]
    MalformedIdentity,
}

/// Signs a token for the given player.
pub fn issue_token(
    player: &Player,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        id: player.id.to_string(),
        name: player.name.clone(),
        iat: now,
        exp: now + config.expiry_mins * 60,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verifies a token and returns the player it identifies.
///
/// Signature and expiry are checked by the JWT layer; the UUID check on
/// the `id` claim is ours.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Player, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|_| AuthError::InvalidToken)?;

    let id: PlayerId = data
        .claims
        .id
        .parse()
        .map_err(|_| AuthError::MalformedIdentity)?;
    Ok(Player::new(id, data.claims.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-long-enough-for-hmac-use".into(),
            expiry_mins: 60,
        }
    }

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_validate_round_trips_identity() {
        let config = test_config();
        let player = Player::new(PlayerId::random(), "alice");

        let token = issue_token(&player, &config).unwrap();
        let validated = validate_token(&token, &config).unwrap();

        assert_eq!(validated.id, player.id);
        assert_eq!(validated.name, "alice");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        // Expired well past the default 60-second leeway.
        let claims = Claims {
            id: PlayerId::random().to_string(),
            name: "alice".into(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode_claims(&claims, &config.secret);

        assert!(matches!(
            validate_token(&token, &config),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let player = Player::new(PlayerId::random(), "alice");
        let token = issue_token(&player, &config).unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-secret".into(),
            expiry_mins: 60,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_non_uuid_identity_rejected() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            id: "definitely-not-a-uuid".into(),
            name: "mallory".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode_claims(&claims, &config.secret);

        assert!(matches!(
            validate_token(&token, &config),
            Err(AuthError::MalformedIdentity)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        assert!(validate_token("not.a.jwt", &config).is_err());
        assert!(validate_token("", &config).is_err());
    }
}
