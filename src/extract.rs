//! Credential extraction from incoming requests.
//!
//! Responsibility:
//! - Parse the `"source:name"` lookup syntax into a [`TokenLookup`].
//! - Pull the raw credential string out of a request (header / query / cookie).
//!
//! Notes:
//! - The auth-scheme prefix (`Bearer `) applies to header transport only;
//!   query parameters and cookies carry the bare token.
//! - Extraction never allocates for header and cookie sources. Query values
//!   are percent-decoded, which may copy.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use axum::http::{HeaderMap, HeaderName, Uri, header};

use crate::error::GateError;

/// Where to look for the credential on an incoming request.
///
/// Parses from the `"source:name"` spec syntax, e.g. `"header:Authorization"`,
/// `"query:access_token"`, `"cookie:jwt"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    /// A request header, checked for the configured auth-scheme prefix.
    Header(HeaderName),
    /// A query-string parameter, carrying the bare token.
    Query(String),
    /// A cookie by name, carrying the bare token.
    Cookie(String),
}

impl Default for TokenLookup {
    fn default() -> Self {
        Self::Header(header::AUTHORIZATION)
    }
}

/// A lookup spec string that does not match `"header:…"`, `"query:…"` or
/// `"cookie:…"`.
#[derive(Debug, Clone)]
pub struct InvalidLookup(String);

impl fmt::Display for InvalidLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid token lookup spec: {:?}", self.0)
    }
}

impl std::error::Error for InvalidLookup {}

impl FromStr for TokenLookup {
    type Err = InvalidLookup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidLookup(s.to_string());
        let (source, name) = s.split_once(':').ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        match source {
            "header" => HeaderName::try_from(name)
                .map(Self::Header)
                .map_err(|_| invalid()),
            "query" => Ok(Self::Query(name.to_string())),
            "cookie" => Ok(Self::Cookie(name.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl TokenLookup {
    /// Locate the raw credential on the request.
    ///
    /// Fails closed with [`GateError::MissingOrMalformed`] when the source is
    /// absent, empty, or (for headers) not prefixed with `scheme + " "`.
    pub(crate) fn extract<'a>(
        &self,
        headers: &'a HeaderMap,
        uri: &'a Uri,
        scheme: &str,
    ) -> Result<Cow<'a, str>, GateError> {
        let found = match self {
            Self::Header(name) => from_header(headers, name, scheme).map(Cow::Borrowed),
            Self::Query(name) => from_query(uri, name),
            Self::Cookie(name) => from_cookie(headers, name).map(Cow::Borrowed),
        };
        found.ok_or(GateError::MissingOrMalformed)
    }
}

// The value must be `<scheme> <token>` with exactly one space and a non-empty
// token. Scheme comparison is exact (case-sensitive).
fn from_header<'a>(headers: &'a HeaderMap, name: &HeaderName, scheme: &str) -> Option<&'a str> {
    let value = headers.get(name)?.to_str().ok()?;
    let token = value.strip_prefix(scheme)?.strip_prefix(' ')?;
    (!token.is_empty()).then_some(token)
}

fn from_query<'a>(uri: &'a Uri, name: &str) -> Option<Cow<'a, str>> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn from_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else { continue };
        for pair in value.split(';') {
            if let Some((key, token)) = pair.trim().split_once('=')
                && key == name
                && !token.is_empty()
            {
                return Some(token);
            }
        }
    }
    None
}
