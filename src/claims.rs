//! Claim sets and downstream access to the verified identity.
//!
//! The claims shape is the gate's type parameter, fixed when the gate is
//! built: [`GenericClaims`] keeps the payload as an open map, any other
//! `Deserialize` type gets the payload decoded straight into its fields.

use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use jsonwebtoken::Algorithm;
use serde::Deserialize;

/// Open claim set: the token payload as an untyped name → value map.
///
/// This is the default claims shape. Anything present in the payload is kept;
/// nothing beyond well-formed JSON is validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct GenericClaims(pub serde_json::Map<String, serde_json::Value>);

impl GenericClaims {
    /// Raw claim value by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    /// String claim by name, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_str())
    }

    /// Integer claim by name, if present and an integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(|v| v.as_i64())
    }

    /// The standard subject claim.
    pub fn sub(&self) -> Option<&str> {
        self.get_str("sub")
    }
}

/// Verified identity, inserted into request extensions by the gate.
///
/// Handlers take it as an extractor argument (the gate must be applied on the
/// route, otherwise extraction rejects with 401):
///
/// ```ignore
/// async fn me(ctx: AuthContext) -> String {
///     ctx.claims().sub().unwrap_or("anonymous").to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthContext<C = GenericClaims> {
    claims: C,
    algorithm: Algorithm,
}

impl<C> AuthContext<C> {
    pub(crate) fn new(claims: C, algorithm: Algorithm) -> Self {
        Self { claims, algorithm }
    }

    /// The decoded claims.
    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Consume the context, keeping the claims.
    pub fn into_claims(self) -> C {
        self.claims
    }

    /// The algorithm the credential was verified under.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl<S, C> FromRequestParts<S> for AuthContext<C>
where
    S: Send + Sync,
    C: Clone + Send + Sync + 'static,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext<C>>()
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
