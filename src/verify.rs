//! Signature verification and claims decoding.

use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation};
use serde::de::DeserializeOwned;

use crate::error::GateError;

/// Verifies raw credentials against one pinned algorithm and key.
///
/// Built once by the gate builder; read-only afterwards, shared across all
/// in-flight requests.
pub(crate) struct Verifier {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("Verifier")
            .field("algorithm", &self.algorithm)
            .field("validation", &self.validation)
            .finish()
    }
}

impl Verifier {
    pub(crate) fn new(
        algorithm: Algorithm,
        decoding_key: DecodingKey,
        validation: Validation,
    ) -> Self {
        Self {
            algorithm,
            decoding_key,
            validation,
        }
    }

    /// Verify the signature and temporal claims, then decode the payload
    /// into `C`.
    ///
    /// The token's self-declared algorithm must equal the pinned one before
    /// any signature work happens; the header's word is never taken for
    /// which algorithm to verify under.
    pub(crate) fn verify<C: DeserializeOwned>(&self, raw: &str) -> Result<TokenData<C>, GateError> {
        let header = jsonwebtoken::decode_header(raw).map_err(GateError::Malformed)?;
        if header.alg != self.algorithm {
            return Err(GateError::AlgorithmMismatch {
                expected: self.algorithm,
                found: header.alg,
            });
        }

        jsonwebtoken::decode::<C>(raw, &self.decoding_key, &self.validation)
            .map_err(GateError::from_verification)
    }
}
