//! Session Token Signing
//!
//! Tokens are `<session_id>.<base64url(hmac_sha256(session_id))>`.
//! The signature binds the token to the server secret so a stolen
//! database row alone cannot be turned into a usable token, and the
//! session id stays opaque and unguessable to clients.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Sign a session ID into a cookie token
pub fn sign_session_token(secret: &[u8; 32], session_id: Uuid) -> AuthResult<String> {
    let session_id = session_id.to_string();

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("HMAC init failed: {e}")))?;
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!(
        "{}.{}",
        session_id,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Parse and verify a session token, returning the session ID
///
/// Any malformed or tampered token yields `SessionInvalid`; callers
/// treat that the same as a missing session.
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id_str, signature_b64) =
        token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::Internal(format!("HMAC init failed: {e}")))?;
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id_str.parse().map_err(|_| AuthError::SessionInvalid)
}
