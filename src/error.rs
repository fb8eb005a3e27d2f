//! Authentication failures and their wire representation.
//!
//! The enum distinguishes failure kinds for logging. The response writer does
//! not: every post-extraction failure maps to the same 401 body, so a caller
//! cannot probe which verification step rejected the credential.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::Algorithm;
use serde::Serialize;
use thiserror::Error;

/// A rejected authentication pass. Terminal for the request.
#[derive(Debug, Error)]
pub enum GateError {
    /// The credential could not be located on the request, or the header
    /// value lacked the `<scheme> <token>` shape. Maps to 400.
    #[error("missing or malformed credential")]
    MissingOrMalformed,

    /// The token's self-declared algorithm differs from the configured one.
    #[error("token algorithm {found:?} does not match configured {expected:?}")]
    AlgorithmMismatch {
        expected: Algorithm,
        found: Algorithm,
    },

    /// Signature did not verify under the configured key, or a configured
    /// issuer/audience expectation failed.
    #[error("signature verification failed")]
    SignatureInvalid(#[source] jsonwebtoken::errors::Error),

    /// `exp` in the past or `nbf` in the future (beyond leeway).
    #[error("credential expired or not yet valid")]
    Expired(#[source] jsonwebtoken::errors::Error),

    /// The credential is not a well-formed token.
    #[error("credential is not a well-formed token")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    /// The payload did not decode into the configured claims shape.
    #[error("claims did not decode into the configured shape")]
    ClaimsDecode(#[source] jsonwebtoken::errors::Error),
}

impl GateError {
    /// Extraction failures are the client's request shape (400); everything
    /// after extraction is an authentication failure (401).
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingOrMalformed => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub(crate) fn from_verification(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => Self::Expired(err),
            // Configured issuer/audience mismatches land here too.
            ErrorKind::InvalidSignature | ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                Self::SignatureInvalid(err)
            }
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => Self::ClaimsDecode(err),
            _ => Self::Malformed(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        // One opaque message for the whole 401 class. The specific kind is
        // logged where the failure happened, never written to the client.
        let (code, message) = match &self {
            GateError::MissingOrMalformed => {
                ("MISSING_CREDENTIAL", "missing or malformed credential")
            }
            _ => ("UNAUTHORIZED", "invalid or expired credential"),
        };

        let body = ErrorResponseBody {
            error: ErrorBody { code, message },
        };

        (self.status(), Json(body)).into_response()
    }
}
