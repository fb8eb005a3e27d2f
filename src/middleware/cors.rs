//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Server-to-server calls are not restricted
//!   by it.
//! - Apply at the Router level, outside the authentication gate, so that
//!   preflight `OPTIONS` requests are answered before credential extraction
//!   ever runs.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Origin policy for the CORS layer.
///
/// An empty allowlist is permissive (`Allow-Origin: *`), without credentials.
/// A non-empty allowlist matches origins exactly.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    pub allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn allow_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }
}

/// Apply the CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine the permissive wildcard with cookie-based credentials.
pub fn apply<S>(router: Router<S>, policy: &CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = if policy.allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = policy
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        });

        CorsLayer::new().allow_origin(allow_origin)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
