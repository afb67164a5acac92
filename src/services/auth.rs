//! Authentication service
//!
//! Stateless admin authentication. A single credential pair comes from
//! configuration; a successful login issues a signed compact token carried
//! in the `session` cookie, and every later request reconstructs the
//! session from that token alone. Nothing is stored server-side.
//!
//! The token is a three-segment `header.claims.signature` string with
//! unpadded base64url segments and an HMAC-SHA256 signature over the first
//! two segments. The header must declare `HS256`; any other algorithm is
//! rejected before signature verification.

use chrono::{DateTime, TimeZone, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::AuthConfig;
use crate::models::Session;

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Default session lifetime in seconds (7 days)
const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Subject claim for the single admin account
const ADMIN_SUBJECT: &str = "1";

/// Error types for token operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// No signing secret is configured
    #[error("No signing secret configured")]
    MissingSecret,

    /// Token does not have the expected shape
    #[error("Malformed token")]
    Malformed,

    /// Token header declares an unsupported algorithm
    #[error("Unsupported token algorithm")]
    WrongAlgorithm,

    /// Signature does not match
    #[error("Invalid token signature")]
    BadSignature,

    /// Token has expired
    #[error("Token expired")]
    Expired,
}

/// A freshly issued token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The signed compact token
    pub token: String,
    /// Absolute expiry time
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Verifies the configured admin credential pair.
///
/// Fails closed: an empty configured email or password never matches
/// anything, including empty input.
pub struct CredentialVerifier {
    email: String,
    password: String,
}

impl CredentialVerifier {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }

    /// Check a submitted credential pair against the configured one.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        if self.email.is_empty() || self.password.is_empty() {
            return false;
        }

        let email_ok = constant_time_eq(self.email.as_bytes(), email.as_bytes());
        let password_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        email_ok && password_ok
    }
}

/// Constant-time byte comparison. Length mismatch is still revealed by
/// timing, the contents are not.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Issues and verifies signed session tokens.
pub struct TokenCodec {
    secret: String,
    ttl_secs: i64,
}

impl TokenCodec {
    /// Create a codec with the default 7-day session lifetime.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            ttl_secs: SESSION_TTL_SECS,
        }
    }

    /// Create a codec with an explicit session lifetime.
    pub fn with_ttl(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Issue a token for the admin with the given email.
    ///
    /// Claims carry the fixed admin subject, issue time and an expiry
    /// one session lifetime out (7 days by default).
    pub fn issue(&self, email: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(email, Utc::now().timestamp())
    }

    fn issue_at(&self, email: &str, now: i64) -> Result<IssuedToken, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let header = TokenHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let claims = TokenClaims {
            sub: ADMIN_SUBJECT.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        // Serialization of these structs cannot fail
        let header_json = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?;
        let claims_json = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;

        let signing_input = format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&header_json),
            BASE64URL_NOPAD.encode(&claims_json)
        );

        let signature = self.sign(signing_input.as_bytes())?;
        let token = format!("{}.{}", signing_input, BASE64URL_NOPAD.encode(&signature));

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Decode and validate a token, returning the session it encodes.
    pub fn decode(&self, token: &str) -> Result<Session, TokenError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    fn decode_at(&self, token: &str, now: i64) -> Result<Session, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut parts = token.split('.');
        let (header_b64, claims_b64, sig_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(TokenError::Malformed),
            };

        let header_json = BASE64URL_NOPAD
            .decode(header_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let header: TokenHeader =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;

        // Reject any declared algorithm other than ours before touching
        // the signature
        if header.alg != "HS256" {
            return Err(TokenError::WrongAlgorithm);
        }

        let signature = BASE64URL_NOPAD
            .decode(sig_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;

        let signing_input = format!("{}.{}", header_b64, claims_b64);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| TokenError::MissingSecret)?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims_json = BASE64URL_NOPAD
            .decode(claims_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;

        // A token is valid strictly before its expiry instant
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(Session {
            subject: claims.sub,
            email: claims.email,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Verify a token, collapsing every failure mode to `None`.
    pub fn verify(&self, token: &str) -> Option<Session> {
        self.decode(token).ok()
    }

    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| TokenError::MissingSecret)?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Authentication facade used by the HTTP layer.
pub struct AuthService {
    verifier: CredentialVerifier,
    codec: TokenCodec,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let ttl_secs = config.session_ttl_days.max(1) * 24 * 60 * 60;
        Self {
            verifier: CredentialVerifier::new(config.admin_email, config.admin_password),
            codec: TokenCodec::with_ttl(config.secret, ttl_secs),
            secure_cookies: config.secure_cookies,
        }
    }

    /// Check submitted credentials against the configured admin pair.
    pub fn verify_credentials(&self, email: &str, password: &str) -> bool {
        self.verifier.verify(email, password)
    }

    /// Issue a session token after successful credential verification.
    pub fn issue_token(&self, email: &str) -> Result<IssuedToken, TokenError> {
        self.codec.issue(email)
    }

    /// Verify a session token. Any failure yields `None`.
    pub fn verify_token(&self, token: &str) -> Option<Session> {
        self.codec.verify(token)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

/// Build the `Set-Cookie` value for a fresh session.
pub fn set_cookie(token: &str, expires_at: DateTime<Utc>, secure: bool) -> String {
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Expires={}",
        SESSION_COOKIE, token, expires
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that removes the session.
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from a request's `Cookie` header, if present.
pub fn session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;

    for pair in cookie_header.split(';') {
        let pair = pair.trim();
        if let Some(value) = pair.strip_prefix(SESSION_COOKIE) {
            if let Some(value) = value.strip_prefix('=') {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn test_codec() -> TokenCodec {
        TokenCodec::new("test-secret-key".to_string())
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = test_codec();

        let issued = codec.issue("admin@example.com").unwrap();
        let session = codec.verify(&issued.token).expect("token should verify");

        assert_eq!(session.email, "admin@example.com");
        assert_eq!(session.subject, "1");
        assert_eq!(session.expires_at - session.issued_at, SESSION_TTL_SECS);
    }

    #[test]
    fn test_issue_without_secret_fails() {
        let codec = TokenCodec::new(String::new());

        let result = codec.issue("admin@example.com");
        assert_eq!(result.unwrap_err(), TokenError::MissingSecret);
    }

    #[test]
    fn test_decode_without_secret_fails() {
        let issued = test_codec().issue("admin@example.com").unwrap();

        let bare = TokenCodec::new(String::new());
        assert_eq!(
            bare.decode(&issued.token).unwrap_err(),
            TokenError::MissingSecret
        );
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = test_codec();
        let issued = codec.issue("admin@example.com").unwrap();

        let (body, sig) = issued.token.rsplit_once('.').unwrap();
        let mut sig_bytes = BASE64URL_NOPAD.decode(sig.as_bytes()).unwrap();

        // Flipping any single signature byte must invalidate the token
        for i in 0..sig_bytes.len() {
            sig_bytes[i] ^= 0x01;
            let tampered = format!("{}.{}", body, BASE64URL_NOPAD.encode(&sig_bytes));
            assert_eq!(
                codec.decode(&tampered).unwrap_err(),
                TokenError::BadSignature,
                "byte {} flip should be detected",
                i
            );
            sig_bytes[i] ^= 0x01;
        }
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let codec = test_codec();
        let issued = codec.issue("admin@example.com").unwrap();

        let parts: Vec<&str> = issued.token.split('.').collect();
        let forged_claims = BASE64URL_NOPAD.encode(
            br#"{"sub":"1","email":"evil@example.com","iat":0,"exp":9999999999}"#,
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert_eq!(codec.decode(&forged).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let codec = test_codec();
        let issued = codec.issue("admin@example.com").unwrap();

        let parts: Vec<&str> = issued.token.split('.').collect();
        let none_header = BASE64URL_NOPAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{}.{}.{}", none_header, parts[1], parts[2]);

        assert_eq!(
            codec.decode(&forged).unwrap_err(),
            TokenError::WrongAlgorithm
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = test_codec();

        for garbage in ["", "a", "a.b", "a.b.c.d", "not base64!!.x.y", "..."] {
            assert_eq!(
                codec.decode(garbage).unwrap_err(),
                TokenError::Malformed,
                "input {:?} should be malformed",
                garbage
            );
            assert!(codec.verify(garbage).is_none());
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = test_codec();
        let issued = codec.issue_at("admin@example.com", 1_000_000).unwrap();

        let exp = 1_000_000 + SESSION_TTL_SECS;

        // Valid strictly before expiry
        assert!(codec.decode_at(&issued.token, exp - 1).is_ok());
        // Invalid at exactly the expiry instant
        assert_eq!(
            codec.decode_at(&issued.token, exp).unwrap_err(),
            TokenError::Expired
        );
        assert_eq!(
            codec.decode_at(&issued.token, exp + 1).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_verify_collapses_failures_to_none() {
        let codec = test_codec();
        assert!(codec.verify("garbage").is_none());

        let other = TokenCodec::new("different-secret".to_string());
        let issued = other.issue("admin@example.com").unwrap();
        assert!(codec.verify(&issued.token).is_none());
    }

    #[test]
    fn test_credential_verifier_happy_path() {
        let verifier =
            CredentialVerifier::new("admin@example.com".to_string(), "hunter2".to_string());

        assert!(verifier.verify("admin@example.com", "hunter2"));
        assert!(!verifier.verify("admin@example.com", "wrong"));
        assert!(!verifier.verify("other@example.com", "hunter2"));
        assert!(!verifier.verify("", ""));
    }

    #[test]
    fn test_credential_verifier_fails_closed_when_unconfigured() {
        let verifier = CredentialVerifier::new(String::new(), String::new());

        // Even matching the empty strings must not authenticate
        assert!(!verifier.verify("", ""));
        assert!(!verifier.verify("admin@example.com", "password"));

        let half = CredentialVerifier::new("admin@example.com".to_string(), String::new());
        assert!(!half.verify("admin@example.com", ""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let expires_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let cookie = set_cookie("tok123", expires_at, false);

        assert!(cookie.starts_with("session=tok123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Expires=Tue, 14 Nov 2023 22:13:20 GMT"));
        assert!(!cookie.contains("Secure"));

        let secure = set_cookie("tok123", expires_at, true);
        assert!(secure.contains("; Secure"));
    }

    #[test]
    fn test_clear_cookie_attributes() {
        let cookie = clear_cookie(false);

        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_session_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc123; lang=en"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_token_absent() {
        let headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        let mut other = HeaderMap::new();
        other.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert!(session_token(&other).is_none());

        // An empty value is treated as no session
        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert!(session_token(&empty).is_none());
    }

    #[test]
    fn test_session_token_ignores_prefixed_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_hint=x; session=real"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("real"));
    }

    #[test]
    fn test_auth_service_end_to_end() {
        let service = AuthService::new(AuthConfig {
            secret: "secret".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "pw".to_string(),
            session_ttl_days: 7,
            secure_cookies: false,
        });

        assert!(service.verify_credentials("admin@example.com", "pw"));

        let issued = service.issue_token("admin@example.com").unwrap();
        let session = service.verify_token(&issued.token).unwrap();
        assert_eq!(session.email, "admin@example.com");
    }
}
