//! Reading claims out of bearer tokens issued by the rental API.
//!
//! A token is the compact `header.payload.signature` form. Only the payload is read: it is
//! base64url-decoded and parsed as a JSON object. The header and signature are ignored and
//! nothing is verified, so these claims say what the token *asserts*, not who the caller is.
//! Expiry is not checked either.
//!
//! The public functions never fail. A token that cannot be read, or that lacks the claim
//! being asked for, is logged and reported as `None`, which callers treat as "send the user
//! back to login". The `try_*` variants return the underlying `Error` for callers that want
//! to know why.
//!
//! # Example
//!
//! ```rust
//! use domain::jwt;
//!
//! // {"alg":"none"} . {"sub":"alice","roles":["ROLE_LANDLORD"]} . (no signature)
//! let token = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJhbGljZSIsInJvbGVzIjpbIlJPTEVfTEFORExPUkQiXX0.";
//!
//! assert_eq!(jwt::resolve_username(token).as_deref(), Some("alice"));
//! assert_eq!(jwt::resolve_role(token).unwrap().as_str(), "LANDLORD");
//! assert!(jwt::resolve_role("not-a-token").is_none());
//! ```

use crate::error::{token_error, DomainErrorKind, Error, TokenErrorKind};
use crate::role::Role;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use log::*;
use serde_json::Value;

use claims::{ROLE_CLAIM, SUBJECT_CLAIM};

pub use claims::ClaimSet;

pub mod claims;

/// Standard-alphabet engine used after the URL-safe characters have been swapped back.
/// Issuers usually drop the `=` padding; some keep it, both are accepted.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes the payload segment of `token` into its claims.
pub fn decode_claims(token: &str) -> Option<ClaimSet> {
    try_decode_claims(token).map_err(report).ok()
}

/// The user's normalized role, from the first entry of `roles` or else from `role`.
pub fn resolve_role(token: &str) -> Option<Role> {
    try_resolve_role(token).map_err(report).ok()
}

/// The user's name, from `sub` or else from `username`.
pub fn resolve_username(token: &str) -> Option<String> {
    try_resolve_username(token).map_err(report).ok()
}

pub fn try_decode_claims(token: &str) -> Result<ClaimSet, Error> {
    let payload = token.split('.').nth(1).ok_or_else(|| {
        token_error(
            TokenErrorKind::MalformedToken,
            "token has no payload segment",
        )
    })?;

    let standard: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    let bytes = PAYLOAD_ENGINE.decode(standard)?;

    match serde_json::from_str::<Value>(&payload_text(bytes)) {
        Ok(Value::Object(map)) => Ok(ClaimSet::from(map)),
        Ok(other) => Err(token_error(
            TokenErrorKind::Parse,
            &format!("payload is {} rather than an object", json_type(&other)),
        )),
        Err(err) => Err(Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Token(TokenErrorKind::Parse),
        }),
    }
}

pub fn try_resolve_role(token: &str) -> Result<Role, Error> {
    role_from_claims(&try_decode_claims(token)?)
}

pub fn try_resolve_username(token: &str) -> Result<String, Error> {
    username_from_claims(&try_decode_claims(token)?)
}

/// Role resolution on claims that were already decoded.
///
/// Tokens carrying several roles resolve to the first one only.
pub fn role_from_claims(claims: &ClaimSet) -> Result<Role, Error> {
    let (claim, candidate) = claims.role_candidate().ok_or_else(|| {
        token_error(
            TokenErrorKind::MissingClaim(ROLE_CLAIM.to_string()),
            "neither `roles` nor `role` is present",
        )
    })?;

    candidate.as_str().and_then(Role::normalize).ok_or_else(|| {
        token_error(
            TokenErrorKind::MissingClaim(claim.to_string()),
            "role claim is empty or not a string",
        )
    })
}

pub fn username_from_claims(claims: &ClaimSet) -> Result<String, Error> {
    claims.principal().ok_or_else(|| {
        token_error(
            TokenErrorKind::MissingClaim(SUBJECT_CLAIM.to_string()),
            "neither `sub` nor `username` holds a value",
        )
    })
}

// The token itself is never logged.
fn report(err: Error) {
    if err.is_missing_claim() {
        debug!("Bearer token lacks an expected claim: {err}");
    } else {
        warn!("Failed to read bearer token claims: {err}");
    }
}

// UTF-8 when possible, otherwise one char per byte (Latin-1).
fn payload_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
