use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use utoipa::ToSchema;

use crate::utils::constant_time_eq;

/// Role carried by every session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Villager,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Villager => write!(f, "villager"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "villager" => Ok(Self::Villager),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

struct Credential {
    password: String,
    role: Role,
}

/// Static table of administrator logins
#[derive(Default)]
pub struct CredentialStore(HashMap<String, Credential>);

impl CredentialStore {
    /// Parse `user:password[:role]` entries separated by `,`.
    /// Role defaults to admin, malformed entries are skipped.
    pub fn parse(entries: &str) -> Self {
        let mut store = Self::default();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(username), Some(password)) = (parts.next(), parts.next()) else {
                tracing::warn!("Ignoring malformed admin credential entry");
                continue;
            };
            let role = match parts.next().map(str::parse::<Role>) {
                None => Role::Admin,
                Some(Ok(role)) => role,
                Some(Err(err)) => {
                    tracing::warn!("Ignoring admin credential for {username}: {err}");
                    continue;
                }
            };
            if username.is_empty() || password.is_empty() {
                tracing::warn!("Ignoring admin credential entry with empty username or password");
                continue;
            }
            store.insert(username, password, role);
        }
        store
    }

    pub fn insert(&mut self, username: &str, password: &str, role: Role) {
        let credential = Credential {
            password: password.to_owned(),
            role,
        };
        self.0.insert(username.to_owned(), credential);
    }

    /// Returns the role of `username` when `password` matches
    pub fn check(&self, username: &str, password: &str) -> Option<Role> {
        let credential = self.0.get(username)?;
        constant_time_eq(&credential.password, password).then_some(credential.role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
