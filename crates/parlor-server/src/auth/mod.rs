//! Bearer-token authentication.
//!
//! Tokens are HS256-signed JWTs carrying the player's id and display
//! name. The identity is entirely inside the token, so there is no
//! session table to consult. The signing key is process-global immutable
//! configuration.

mod extract;
mod jwt;

pub use extract::AuthPlayer;
pub use jwt::{issue_token, validate_token, AuthError, Claims};
