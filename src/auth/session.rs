use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    codec::{JwtCodec, OpaqueCodec, TokenCodec},
    credentials::{CredentialStore, Role},
};
use crate::{
    config::{AppConfig, TokenStrategy},
    constants::*,
    store::Expiring,
    utils::{get_epoch_ts, random_token},
};

/// Who a session belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Principal {
    Admin {
        username: String,
        role: Role,
    },
    Villager {
        phone: String,
        #[serde(rename = "villagerId")]
        villager_id: Option<u32>,
        name: String,
        village: String,
        panchayat: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub principal: Principal,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

impl SessionClaims {
    pub fn role(&self) -> Role {
        match &self.principal {
            Principal::Admin { role, .. } => *role,
            Principal::Villager { .. } => Role::Villager,
        }
    }

    /// Valid up to and including `exp`
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.exp
    }

    pub fn villager_id(&self) -> Option<u32> {
        match &self.principal {
            Principal::Villager { villager_id, .. } => *villager_id,
            Principal::Admin { .. } => None,
        }
    }
}

impl Expiring for SessionClaims {
    fn expires_at(&self) -> u64 {
        self.exp
    }
}

/// Profile data captured into a villager session at issuance
#[derive(Debug, Clone, PartialEq)]
pub struct VillagerIdentity {
    pub phone: String,
    pub villager_id: Option<u32>,
    pub name: String,
    pub village: String,
    pub panchayat: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid or expired token")]
    Invalid,
    #[error("This action requires a {0} session")]
    Forbidden(Role),
    #[error("Not able to issue token: {0}")]
    Encoding(#[from] anyhow::Error),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::Invalid => "INVALID_TOKEN",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Encoding(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Issues and validates admin and villager sessions
pub struct SessionManager {
    codec: Box<dyn TokenCodec>,
    credentials: CredentialStore,
    admin_ttl: u64,
    villager_ttl: u64,
}

impl SessionManager {
    pub fn new(
        codec: Box<dyn TokenCodec>,
        credentials: CredentialStore,
        admin_ttl: u64,
        villager_ttl: u64,
    ) -> Self {
        Self {
            codec,
            credentials,
            admin_ttl,
            villager_ttl,
        }
    }

    /// Fails for the jwt strategy when no signing secret is configured
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let codec: Box<dyn TokenCodec> = match config.token_strategy {
            TokenStrategy::Opaque => Box::new(OpaqueCodec::in_memory()),
            TokenStrategy::Jwt => {
                let Some(secret) = config.jwt_secret.as_deref() else {
                    anyhow::bail!("jwt session tokens need a signing secret");
                };
                Box::new(JwtCodec::new(secret))
            }
        };
        tracing::debug!("Using {} session tokens", config.token_strategy);
        let credentials = CredentialStore::parse(&config.admin_credentials);
        Ok(Self::new(
            codec,
            credentials,
            config.admin_session_ttl,
            config.villager_session_ttl,
        ))
    }

    pub fn issue_admin_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        self.issue_admin_session_at(username, password, get_epoch_ts())
    }

    pub fn issue_admin_session_at(
        &self,
        username: &str,
        password: &str,
        now: u64,
    ) -> Result<IssuedSession, AuthError> {
        let role = self
            .credentials
            .check(username, password)
            .ok_or(AuthError::InvalidCredentials)?;
        self.issue_admin_session_for(username, role, now)
    }

    /// Admin session for a principal already authenticated by the caller
    pub fn issue_admin_session_for(
        &self,
        username: &str,
        role: Role,
        now: u64,
    ) -> Result<IssuedSession, AuthError> {
        let principal = Principal::Admin {
            username: username.to_owned(),
            role,
        };
        self.issue(principal, now, self.admin_ttl)
    }

    pub fn issue_villager_session(
        &self,
        identity: VillagerIdentity,
    ) -> Result<IssuedSession, AuthError> {
        self.issue_villager_session_at(identity, get_epoch_ts())
    }

    pub fn issue_villager_session_at(
        &self,
        identity: VillagerIdentity,
        now: u64,
    ) -> Result<IssuedSession, AuthError> {
        let principal = Principal::Villager {
            phone: identity.phone,
            villager_id: identity.villager_id,
            name: identity.name,
            village: identity.village,
            panchayat: identity.panchayat,
        };
        self.issue(principal, now, self.villager_ttl)
    }

    fn issue(&self, principal: Principal, now: u64, ttl: u64) -> Result<IssuedSession, AuthError> {
        let claims = SessionClaims {
            principal,
            iat: now,
            exp: now + ttl,
            jti: random_token(TOKEN_ID_BYTES),
        };
        let token = self.codec.encode(&claims)?;
        Ok(IssuedSession { token, claims })
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.validate_at(token, get_epoch_ts())
    }

    pub fn validate_at(&self, token: &str, now: u64) -> Result<SessionClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        let claims = self.codec.decode(token).ok_or(AuthError::Invalid)?;
        if claims.is_expired_at(now) {
            tracing::debug!("Session {} expired at {}", claims.jti, claims.exp);
            self.codec.evict(token);
            return Err(AuthError::Invalid);
        }
        Ok(claims)
    }

    /// Logout, the token is rejected by every later validation
    pub fn revoke(&self, token: &str, claims: &SessionClaims) {
        self.codec.revoke(token, claims);
    }

    pub fn sweep_expired(&self, now: u64) -> usize {
        self.codec.sweep_expired(now)
    }

    pub fn has_admin_credentials(&self) -> bool {
        !self.credentials.is_empty()
    }
}

pub fn require_role(claims: &SessionClaims, role: Role) -> Result<(), AuthError> {
    if claims.role() != role {
        return Err(AuthError::Forbidden(role));
    }
    Ok(())
}
