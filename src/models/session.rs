//! Session model
//!
//! A session is reconstructed entirely from a signed token carried in the
//! `session` cookie. It is never stored server-side.

use serde::{Deserialize, Serialize};

/// Authenticated admin session, decoded from a verified token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Subject identifier (always "1", there is a single admin)
    pub subject: String,
    /// Admin email the session was issued for
    pub email: String,
    /// Issue time, Unix seconds
    pub issued_at: i64,
    /// Expiry time, Unix seconds
    pub expires_at: i64,
}
