use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;

use super::session::SessionClaims;
use crate::{
    constants::*,
    store::{EphemeralStore, Expiring, MemoryStore},
    utils::random_token,
};

/// Turns session claims into bearer tokens and back.
///
/// `decode` only answers "which claims does this token carry", expiry policy is
/// applied by the [`SessionManager`](super::SessionManager).
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &SessionClaims) -> anyhow::Result<String>;

    fn decode(&self, token: &str) -> Option<SessionClaims>;

    /// Drop server side state kept for an expired token
    fn evict(&self, token: &str);

    /// Make `token` unusable before its expiry
    fn revoke(&self, token: &str, claims: &SessionClaims);

    fn sweep_expired(&self, now: u64) -> usize;
}

/// Random identifiers mapped to claims in a server side table
pub struct OpaqueCodec {
    sessions: Arc<dyn EphemeralStore<SessionClaims>>,
}

impl OpaqueCodec {
    pub fn new(sessions: Arc<dyn EphemeralStore<SessionClaims>>) -> Self {
        Self { sessions }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl TokenCodec for OpaqueCodec {
    fn encode(&self, claims: &SessionClaims) -> anyhow::Result<String> {
        let token = random_token(OPAQUE_TOKEN_BYTES);
        self.sessions.set(&token, claims.clone());
        Ok(token)
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        self.sessions.get(token)
    }

    fn evict(&self, token: &str) {
        self.sessions.delete(token);
    }

    fn revoke(&self, token: &str, _claims: &SessionClaims) {
        self.sessions.delete(token);
    }

    fn sweep_expired(&self, now: u64) -> usize {
        self.sessions.sweep_expired(now)
    }
}

#[derive(Debug, Clone)]
pub struct RevokedToken {
    expires_at: u64,
}

impl Expiring for RevokedToken {
    fn expires_at(&self) -> u64 {
        self.expires_at
    }
}

/// Self describing HS256 tokens, only revoked token ids are kept server side
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    revoked: Arc<dyn EphemeralStore<RevokedToken>>,
}

impl JwtCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            revoked: Arc::new(MemoryStore::new()),
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::default();
        // expiry is checked by the session manager without leeway
        validation.validate_exp = false;
        validation
    }
}

impl TokenCodec for JwtCodec {
    fn encode(&self, claims: &SessionClaims) -> anyhow::Result<String> {
        let token = encode(&Header::default(), claims, &self.encoding)?;
        Ok(token)
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding, &Self::validation())
            .map_err(|err| tracing::debug!("Not able to decode token: {err}"))
            .ok()?;
        let claims = token_data.claims;
        if self.revoked.get(&claims.jti).is_some() {
            tracing::debug!("Token {} has been revoked", claims.jti);
            return None;
        }
        Some(claims)
    }

    fn evict(&self, _token: &str) {}

    fn revoke(&self, _token: &str, claims: &SessionClaims) {
        let entry = RevokedToken {
            expires_at: claims.exp,
        };
        self.revoked.set(&claims.jti, entry);
    }

    fn sweep_expired(&self, now: u64) -> usize {
        self.revoked.sweep_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{session::Principal, Role};

    fn admin_claims(exp: u64) -> SessionClaims {
        SessionClaims {
            principal: Principal::Admin {
                username: "admin".to_owned(),
                role: Role::Admin,
            },
            iat: 100,
            exp,
            jti: random_token(TOKEN_ID_BYTES),
        }
    }

    #[test]
    fn test_opaque_tokens_are_random_and_lookup_based() {
        let codec = OpaqueCodec::in_memory();
        let claims = admin_claims(200);
        let token1 = codec.encode(&claims).unwrap();
        let token2 = codec.encode(&claims).unwrap();
        assert_ne!(token1, token2);
        assert!(!token1.contains("admin"));
        assert_eq!(codec.decode(&token1), Some(claims.clone()));
        codec.revoke(&token1, &claims);
        assert_eq!(codec.decode(&token1), None);
        assert_eq!(codec.decode(&token2), Some(claims));
        assert_eq!(codec.decode("made-up-token"), None);
    }

    #[test]
    fn test_opaque_sweep_and_evict() {
        let codec = OpaqueCodec::in_memory();
        let old = codec.encode(&admin_claims(150)).unwrap();
        let fresh = codec.encode(&admin_claims(500)).unwrap();
        assert_eq!(codec.sweep_expired(200), 1);
        assert_eq!(codec.decode(&old), None);
        codec.evict(&fresh);
        assert_eq!(codec.decode(&fresh), None);
    }

    #[test]
    fn test_jwt_round_trip_and_revocation() {
        let codec = JwtCodec::new("test-secret");
        let claims = admin_claims(u64::MAX / 2);
        let token = codec.encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode(&token), Some(claims.clone()));
        codec.revoke(&token, &claims);
        assert_eq!(codec.decode(&token), None);
    }

    #[test]
    fn test_jwt_decodes_expired_claims_for_manager() {
        let codec = JwtCodec::new("test-secret");
        let claims = admin_claims(150);
        let token = codec.encode(&claims).unwrap();
        // expiry policy lives in the session manager
        assert_eq!(codec.decode(&token).map(|c| c.exp), Some(150));
    }

    #[test]
    fn test_jwt_rejects_forged_and_tampered_tokens() {
        let codec = JwtCodec::new("test-secret");
        let forger = JwtCodec::new("other-secret");
        let forged = forger.encode(&admin_claims(u64::MAX / 2)).unwrap();
        assert_eq!(codec.decode(&forged), None);
        let token = codec.encode(&admin_claims(u64::MAX / 2)).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert_eq!(codec.decode(&tampered), None);
        assert_eq!(codec.decode("villager-1700000000000-9876543210"), None);
    }
}
