//! Gate configuration and build-time validation.
//!
//! Responsibility:
//! - Builder with the documented defaults
//!   (`Bearer` / `header:Authorization` / `HS256` / open claim map).
//! - Key-material handling and key-vs-algorithm consistency.
//! - Fail at build time, not per request, on misconfiguration.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;

use crate::claims::GenericClaims;
use crate::error::GateError;
use crate::extract::TokenLookup;
use crate::middleware::gate::{ErrorHook, JwtGate, SuccessHook};
use crate::verify::Verifier;

const DEFAULT_SCHEME: &str = "Bearer";
const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS256;

/// A misconfigured gate. Fatal at build time; never produced per request.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(what) => write!(f, "missing configuration: {}", what),
            ConfigError::Invalid(what) => write!(f, "invalid configuration: {}", what),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material for credential verification.
///
/// Symmetric secrets pair with `HS*`; PEM-encoded keys pair with their
/// asymmetric families. The pairing is checked when the gate is built.
pub enum SigningKey {
    /// Shared secret for `HS256` / `HS384` / `HS512`.
    Secret(Vec<u8>),
    /// PEM-encoded RSA public key for `RS*` / `PS*`.
    RsaPem(Vec<u8>),
    /// PEM-encoded EC public key for `ES256` / `ES384`.
    EcPem(Vec<u8>),
    /// PEM-encoded Ed25519 public key for `EdDSA`.
    EdPem(Vec<u8>),
}

impl SigningKey {
    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Secret(bytes.into())
    }

    pub fn rsa_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::RsaPem(pem.into())
    }

    pub fn ec_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::EcPem(pem.into())
    }

    pub fn ed_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::EdPem(pem.into())
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Secret(b) | Self::RsaPem(b) | Self::EcPem(b) | Self::EdPem(b) => b.is_empty(),
        }
    }

    fn matches(&self, algorithm: Algorithm) -> bool {
        use Algorithm::*;
        matches!(
            (algorithm, self),
            (HS256 | HS384 | HS512, Self::Secret(_))
                | (RS256 | RS384 | RS512 | PS256 | PS384 | PS512, Self::RsaPem(_))
                | (ES256 | ES384, Self::EcPem(_))
                | (EdDSA, Self::EdPem(_))
        )
    }

    fn into_decoding_key(self, algorithm: Algorithm) -> Result<DecodingKey, ConfigError> {
        if !self.matches(algorithm) {
            return Err(ConfigError::Invalid("signing key kind for algorithm"));
        }
        match self {
            Self::Secret(bytes) => Ok(DecodingKey::from_secret(&bytes)),
            Self::RsaPem(pem) => DecodingKey::from_rsa_pem(&pem)
                .map_err(|_| ConfigError::Invalid("signing key PEM")),
            Self::EcPem(pem) => {
                DecodingKey::from_ec_pem(&pem).map_err(|_| ConfigError::Invalid("signing key PEM"))
            }
            Self::EdPem(pem) => {
                DecodingKey::from_ed_pem(&pem).map_err(|_| ConfigError::Invalid("signing key PEM"))
            }
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        let kind = match self {
            Self::Secret(_) => "Secret",
            Self::RsaPem(_) => "RsaPem",
            Self::EcPem(_) => "EcPem",
            Self::EdPem(_) => "EdPem",
        };
        write!(f, "SigningKey::{}(..)", kind)
    }
}

/// Builder for [`JwtGate`]. Obtained via [`JwtGate::builder`].
///
/// The signing key is the one required field. Everything else has a default:
/// scheme `Bearer`, lookup `header:Authorization`, algorithm `HS256`, zero
/// clock-skew leeway, no issuer/audience expectation, no hooks.
pub struct GateBuilder<C = GenericClaims> {
    lookup: TokenLookup,
    scheme: String,
    algorithm: Algorithm,
    signing_key: Option<SigningKey>,
    leeway_seconds: u64,
    issuer: Option<String>,
    audience: Option<String>,
    on_error: Option<ErrorHook>,
    on_success: Option<SuccessHook<C>>,
}

impl<C> GateBuilder<C> {
    pub(crate) fn new() -> Self {
        Self {
            lookup: TokenLookup::default(),
            scheme: DEFAULT_SCHEME.to_string(),
            algorithm: DEFAULT_ALGORITHM,
            signing_key: None,
            leeway_seconds: 0,
            issuer: None,
            audience: None,
            on_error: None,
            on_success: None,
        }
    }

    /// Where to find the credential on the request.
    /// [`TokenLookup`] parses from `"source:name"` spec strings.
    pub fn lookup(mut self, lookup: TokenLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Auth-scheme prefix for header lookup. An empty string falls back to
    /// the default.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The one signing algorithm credentials must be signed with.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Key material to verify signatures against. Required.
    pub fn signing_key(mut self, key: SigningKey) -> Self {
        self.signing_key = Some(key);
        self
    }

    /// Clock-skew tolerance for `exp` / `nbf`, in seconds.
    pub fn leeway_seconds(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Require the `iss` claim to equal this value.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require the `aud` claim to contain this value.
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Hook invoked on every rejection. May substitute the error (and with it
    /// the response); returning `None` keeps the original. The request halts
    /// either way.
    pub fn on_error(
        mut self,
        hook: impl Fn(&GateError) -> Option<GateError> + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Hook invoked with the decoded claims on every accepted request.
    /// Side-effecting only; its result is ignored.
    pub fn on_success(mut self, hook: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and build the gate.
    pub fn build(self) -> Result<JwtGate<C>, ConfigError>
    where
        C: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = self
            .signing_key
            .ok_or(ConfigError::Missing("signing key"))?;
        if key.is_empty() {
            return Err(ConfigError::Missing("signing key"));
        }
        let decoding_key = key.into_decoding_key(self.algorithm)?;

        let mut validation = Validation::new(self.algorithm);
        // Temporal claims are enforced when present, not required to exist.
        validation.set_required_spec_claims::<&str>(&[]);
        validation.validate_nbf = true;
        validation.leeway = self.leeway_seconds;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
        }

        let scheme = if self.scheme.is_empty() {
            DEFAULT_SCHEME.to_string()
        } else {
            self.scheme
        };

        Ok(JwtGate::from_parts(
            self.lookup,
            scheme,
            Verifier::new(self.algorithm, decoding_key, validation),
            self.on_error,
            self.on_success,
        ))
    }
}
