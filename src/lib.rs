//! JWT bearer authentication for axum routers.
//!
//! The gate runs in front of your handlers: it locates a signed credential on
//! each request, verifies it against one pinned algorithm and key, decodes
//! the claims, and either injects the verified identity into the request or
//! answers with a JSON error and stops the chain. A malformed, foreign-signed
//! or expired credential never reaches a handler.
//!
//! # Usage
//!
//! ```rust
//! use axum::{Router, routing::get};
//! use jwt_gate::{AuthContext, JwtGate, SigningKey, middleware};
//!
//! async fn me(ctx: AuthContext) -> String {
//!     ctx.claims().sub().unwrap_or("anonymous").to_string()
//! }
//!
//! # fn main() -> Result<(), jwt_gate::ConfigError> {
//! let gate: JwtGate = JwtGate::builder()
//!     .signing_key(SigningKey::secret("change-me"))
//!     .build()?;
//!
//! let router: Router = Router::new().route("/me", get(me));
//! let router = middleware::gate::apply(router, gate);
//! # let _ = router;
//! # Ok(())
//! # }
//! ```
//!
//! Claims decode into an open map by default ([`GenericClaims`]). For a
//! declared shape, make the gate generic over your own `Deserialize` type;
//! the choice is fixed when the gate is built, not per request:
//!
//! ```rust
//! use jwt_gate::{AuthContext, JwtGate, SigningKey};
//!
//! #[derive(Clone, serde::Deserialize)]
//! struct ApiClaims {
//!     sub: String,
//!     role: String,
//! }
//!
//! async fn role(ctx: AuthContext<ApiClaims>) -> String {
//!     ctx.claims().role.clone()
//! }
//!
//! # fn main() -> Result<(), jwt_gate::ConfigError> {
//! let gate = JwtGate::<ApiClaims>::builder()
//!     .signing_key(SigningKey::secret("change-me"))
//!     .build()?;
//! # let _ = (gate, role);
//! # Ok(())
//! # }
//! ```
//!
//! Rejections are opaque by design: extraction failures answer 400, every
//! verification-stage failure answers the same 401 body. The distinction
//! between a bad signature, a foreign algorithm and an expired token exists
//! only in the logs.

pub mod claims;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;

mod verify;

pub use claims::{AuthContext, GenericClaims};
pub use config::{ConfigError, GateBuilder, SigningKey};
pub use error::GateError;
pub use extract::TokenLookup;
pub use middleware::cors::CorsPolicy;
pub use middleware::gate::{ErrorHook, JwtGate, SuccessHook};

// Callers configure the algorithm without depending on the token library.
pub use jsonwebtoken::Algorithm;
