//! Simulated token model.
//!
//! A token here is three part-presence flags plus display-only claims.
//! Nothing in this module signs, verifies, or encodes anything; the
//! compact preview is a fixed classroom sample, not an encoding of the
//! claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::session::role::Role;

/// Sample header segment shown in the token details panel.
pub const SAMPLE_HEADER: &str = "eyJ0eXAi";
/// Sample payload segment shown in the token details panel.
pub const SAMPLE_PAYLOAD: &str = "eyJzdWIi";
/// Sample signature segment shown in the token details panel.
pub const SAMPLE_SIGNATURE: &str = "SflKxwRJ";

// =============================================================================
// CLAIMS
// =============================================================================

/// Display-only claims carried by a simulated token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the username given at login.
    pub sub: String,
    /// Token id, fresh per issuance.
    pub jti: Uuid,
    /// Issue timestamp.
    pub iat: DateTime<Utc>,
    /// Granted role.
    pub role: Role,
}

impl TokenClaims {
    /// Build claims for a new login.
    pub fn new(sub: impl Into<String>, role: Role) -> Self {
        Self {
            sub: sub.into(),
            jti: Uuid::new_v4(),
            iat: Utc::now(),
            role,
        }
    }

    /// Derive a stable 16-byte subject id from the subject string.
    ///
    /// Same subject, same id; used for compact logging and for telling
    /// sessions apart without comparing raw usernames.
    pub fn subject_id(&self) -> [u8; 16] {
        let mut hasher = Sha256::new();
        hasher.update(b"token-quest-subject:");
        hasher.update(self.sub.as_bytes());
        let hash = hasher.finalize();

        let mut id = [0u8; 16];
        id.copy_from_slice(&hash[..16]);
        id
    }
}

// =============================================================================
// SIMULATED TOKEN
// =============================================================================

/// A simulated three-part token.
///
/// At rest a token is always complete; the part flags exist so the
/// presentation layer can narrate construction piece by piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatedToken {
    /// Header part present.
    pub header_present: bool,
    /// Payload part present.
    pub payload_present: bool,
    /// Signature part present.
    pub signature_present: bool,
    /// Display-only claims.
    pub claims: TokenClaims,
}

impl SimulatedToken {
    /// Issue a complete token (all three parts present).
    pub fn issue(sub: impl Into<String>, role: Role) -> Self {
        Self {
            header_present: true,
            payload_present: true,
            signature_present: true,
            claims: TokenClaims::new(sub, role),
        }
    }

    /// True iff all three parts are present.
    pub fn is_complete(&self) -> bool {
        self.header_present && self.payload_present && self.signature_present
    }

    /// The fixed sample compact form shown in the UI.
    pub fn compact_preview(&self) -> String {
        format!("{SAMPLE_HEADER}.{SAMPLE_PAYLOAD}.{SAMPLE_SIGNATURE}")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_is_complete() {
        let token = SimulatedToken::issue("morgan", Role::User);
        assert!(token.header_present);
        assert!(token.payload_present);
        assert!(token.signature_present);
        assert!(token.is_complete());
        assert_eq!(token.claims.sub, "morgan");
        assert_eq!(token.claims.role, Role::User);
    }

    #[test]
    fn test_incomplete_token_detected() {
        let mut token = SimulatedToken::issue("morgan", Role::User);
        token.signature_present = false;
        assert!(!token.is_complete());
    }

    #[test]
    fn test_subject_id_derivation() {
        let a = TokenClaims::new("morgan", Role::User);
        let b = TokenClaims::new("morgan", Role::Admin);
        let c = TokenClaims::new("robin", Role::User);

        // Same subject gives the same id regardless of role or jti.
        assert_eq!(a.subject_id(), b.subject_id());

        // Different subject gives a different id.
        assert_ne!(a.subject_id(), c.subject_id());
    }

    #[test]
    fn test_fresh_jti_per_issuance() {
        let a = SimulatedToken::issue("morgan", Role::User);
        let b = SimulatedToken::issue("morgan", Role::User);
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn test_compact_preview_shape() {
        let token = SimulatedToken::issue("morgan", Role::User);
        let preview = token.compact_preview();
        assert_eq!(preview.split('.').count(), 3);
        assert!(preview.starts_with(SAMPLE_HEADER));
    }
}
