//! HTTP server for the parlor game backend.
//!
//! Everything outward-facing lives here: bearer-token auth, the lobby
//! and game endpoints, configuration, and the wiring that assembles the
//! kernel (module registry, persistence worker, supervisor) into a
//! running process. Exposed as a library so integration tests can build
//! the exact router the binary serves.

pub mod auth;
pub mod config;
pub mod error;
pub mod modules;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{JwtConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use router::build_router;
pub use state::AppState;
