//! The authentication gate.
//!
//! Per request: extract → verify → bind, then exactly one side effect —
//! insert the verified identity into request extensions and forward, or
//! write the rejection response and stop the chain. Any ambiguity, parse
//! error or expiry resolves to rejection; a request never reaches a
//! downstream handler with an unverified credential.
//!
//! Example:
//! ```ignore
//! let gate: JwtGate = JwtGate::builder()
//!     .signing_key(SigningKey::secret(secret))
//!     .build()?;
//! let router = middleware::gate::apply(router, gate);
//! ```

use std::fmt;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Uri},
    middleware::{self, Next},
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::claims::{AuthContext, GenericClaims};
use crate::config::GateBuilder;
use crate::error::GateError;
use crate::extract::TokenLookup;
use crate::verify::Verifier;

/// Rejection hook: may substitute the error before the response is written.
/// `None` keeps the original. The request halts either way.
pub type ErrorHook = Arc<dyn Fn(&GateError) -> Option<GateError> + Send + Sync>;

/// Acceptance hook: observes the decoded claims. The outcome of the request
/// does not depend on it.
pub type SuccessHook<C> = Arc<dyn Fn(&C) + Send + Sync>;

/// The configured authentication gate.
///
/// `C` is the claims shape, fixed here at build time: [`GenericClaims`] (the
/// default) keeps the payload as an open map, any other `Deserialize` type
/// gets the payload decoded into its fields.
///
/// Cheap to clone; immutable after build, safely shared across requests.
pub struct JwtGate<C = GenericClaims> {
    inner: Arc<GateInner<C>>,
}

struct GateInner<C> {
    lookup: TokenLookup,
    scheme: String,
    verifier: Verifier,
    on_error: Option<ErrorHook>,
    on_success: Option<SuccessHook<C>>,
}

impl<C> Clone for JwtGate<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for JwtGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtGate")
            .field("lookup", &self.inner.lookup)
            .field("scheme", &self.inner.scheme)
            .field("verifier", &self.inner.verifier)
            .finish()
    }
}

impl<C> JwtGate<C>
where
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn builder() -> GateBuilder<C> {
        GateBuilder::new()
    }

    pub(crate) fn from_parts(
        lookup: TokenLookup,
        scheme: String,
        verifier: Verifier,
        on_error: Option<ErrorHook>,
        on_success: Option<SuccessHook<C>>,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                lookup,
                scheme,
                verifier,
                on_error,
                on_success,
            }),
        }
    }

    /// Run one full authentication pass against request parts.
    ///
    /// This is the middleware's core, exposed for callers that drive the
    /// gate outside a router (tests, custom pipelines).
    pub fn evaluate(&self, headers: &HeaderMap, uri: &Uri) -> Result<AuthContext<C>, GateError> {
        let inner = &self.inner;
        let raw = inner.lookup.extract(headers, uri, &inner.scheme)?;
        let data = inner.verifier.verify::<C>(&raw)?;
        Ok(AuthContext::new(data.claims, data.header.alg))
    }
}

/// Apply the gate to every route of `router`.
pub fn apply<S, C>(router: Router<S>, gate: JwtGate<C>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware::<C>))
}

async fn gate_middleware<C>(
    State(gate): State<JwtGate<C>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GateError>
where
    C: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let ctx = match gate.evaluate(req.headers(), req.uri()) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(error = ?err, "request authentication failed");
            let err = match &gate.inner.on_error {
                Some(hook) => hook(&err).unwrap_or(err),
                None => err,
            };
            return Err(err);
        }
    };

    if let Some(hook) = &gate.inner.on_success {
        hook(ctx.claims());
    }

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
