//! Configuration-surface tests: non-header credential sources, custom
//! schemes, issuer/audience expectations, leeway, and build-time validation.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use jwt_gate::{
    Algorithm, AuthContext, ConfigError, GenericClaims, JwtGate, SigningKey, TokenLookup,
    middleware::gate,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "top-secret";

fn mint(claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token encodes")
}

fn valid_claims() -> Value {
    json!({
        "sub": "user-1",
        "exp": Utc::now().timestamp() + 600,
    })
}

async fn me(ctx: AuthContext) -> String {
    ctx.claims().sub().unwrap_or_default().to_string()
}

fn router_with(gate: JwtGate) -> Router {
    gate::apply(Router::new().route("/me", get(me)), gate)
}

async fn status_of(router: Router, req: Request<Body>) -> StatusCode {
    router.oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn query_lookup_reads_the_named_parameter() {
    let gate: JwtGate = JwtGate::builder()
        .signing_key(SigningKey::secret(SECRET))
        .lookup("query:access_token".parse().unwrap())
        .build()
        .unwrap();
    let router = router_with(gate);

    let token = mint(&valid_claims());
    let ok = Request::builder()
        .uri(format!("/me?access_token={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router.clone(), ok).await, StatusCode::OK);

    let missing = Request::builder()
        .uri("/me?other=1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router, missing).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cookie_lookup_reads_the_named_cookie() {
    let gate: JwtGate = JwtGate::builder()
        .signing_key(SigningKey::secret(SECRET))
        .lookup(TokenLookup::Cookie("jwt".to_string()))
        .build()
        .unwrap();
    let router = router_with(gate);

    let token = mint(&valid_claims());
    let ok = Request::builder()
        .uri("/me")
        .header(header::COOKIE, format!("session=s1; jwt={token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router.clone(), ok).await, StatusCode::OK);

    let missing = Request::builder()
        .uri("/me")
        .header(header::COOKIE, "session=s1")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router, missing).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_scheme_replaces_bearer() {
    let gate: JwtGate = JwtGate::builder()
        .signing_key(SigningKey::secret(SECRET))
        .scheme("Token")
        .build()
        .unwrap();
    let router = router_with(gate);

    let token = mint(&valid_claims());
    let ok = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Token {token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router.clone(), ok).await, StatusCode::OK);

    let bearer = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router, bearer).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn issuer_expectation_is_enforced_when_configured() {
    let gate: JwtGate = JwtGate::builder()
        .signing_key(SigningKey::secret(SECRET))
        .issuer("https://issuer.example.com")
        .build()
        .unwrap();
    let router = router_with(gate);

    let now = Utc::now().timestamp();
    let ok_token = mint(&json!({
        "sub": "user-1",
        "iss": "https://issuer.example.com",
        "exp": now + 600,
    }));
    let ok = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {ok_token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router.clone(), ok).await, StatusCode::OK);

    let foreign = mint(&json!({
        "sub": "user-1",
        "iss": "https://elsewhere.example.com",
        "exp": now + 600,
    }));
    let bad = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {foreign}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router, bad).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn leeway_tolerates_clock_skew_on_expiry() {
    let gate: JwtGate = JwtGate::builder()
        .signing_key(SigningKey::secret(SECRET))
        .leeway_seconds(60)
        .build()
        .unwrap();
    let router = router_with(gate);

    // Expired 30 seconds ago: inside the 60s tolerance.
    let token = mint(&json!({"sub": "user-1", "exp": Utc::now().timestamp() - 30}));
    let req = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_of(router, req).await, StatusCode::OK);
}

#[test]
fn building_without_a_signing_key_fails() {
    let err = JwtGate::<GenericClaims>::builder()
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Missing("signing key")));
}

#[test]
fn building_with_an_empty_secret_fails() {
    let err = JwtGate::<GenericClaims>::builder()
        .signing_key(SigningKey::secret(""))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Missing("signing key")));
}

#[test]
fn building_with_a_mismatched_key_kind_fails() {
    let err = JwtGate::<GenericClaims>::builder()
        .signing_key(SigningKey::secret(SECRET))
        .algorithm(Algorithm::RS256)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn building_with_garbage_pem_fails() {
    let err = JwtGate::<GenericClaims>::builder()
        .signing_key(SigningKey::rsa_pem("not a pem"))
        .algorithm(Algorithm::RS256)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
